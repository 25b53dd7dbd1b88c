//! Serializable, sorted copy of the registry index for diagnostics.

use std::collections::BTreeMap;

use serde::Serialize;
use wiring_model::{AttributeValue, RevisionId};

use crate::error::Result;
use crate::registry::CapabilityMap;

/// Point-in-time copy of the registry, ordered by provider, then capability,
/// then requirer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrySnapshot {
    pub providers: Vec<ProviderEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderEntry {
    pub provider: RevisionId,
    pub capabilities: Vec<CapabilityEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapabilityEntry {
    pub namespace: String,
    pub attributes: BTreeMap<String, AttributeValue>,
    pub wires: Vec<WireEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct WireEntry {
    pub requirer: RevisionId,
    pub requirement: String,
}

impl RegistrySnapshot {
    pub(crate) fn from_dependents<'a, I>(dependents: I) -> Self
    where
        I: IntoIterator<Item = (&'a RevisionId, &'a CapabilityMap)>,
    {
        let mut providers: Vec<ProviderEntry> = dependents
            .into_iter()
            .map(|(provider, capabilities)| {
                let mut capabilities: Vec<CapabilityEntry> = capabilities
                    .iter()
                    .map(|(cap, wires)| {
                        let mut wires: Vec<WireEntry> = wires
                            .iter()
                            .map(|wire| WireEntry {
                                requirer: wire.requirer(),
                                requirement: wire.requirement().filter().to_string(),
                            })
                            .collect();
                        wires.sort();
                        CapabilityEntry {
                            namespace: cap.namespace().to_string(),
                            attributes: cap.attributes().clone(),
                            wires,
                        }
                    })
                    .collect();
                capabilities.sort_by(|a, b| {
                    (&a.namespace, &a.attributes).cmp(&(&b.namespace, &b.attributes))
                });
                ProviderEntry {
                    provider: *provider,
                    capabilities,
                }
            })
            .collect();
        providers.sort_by_key(|entry| entry.provider);
        Self { providers }
    }

    /// Total number of wires in the snapshot.
    pub fn wire_count(&self) -> usize {
        self.providers
            .iter()
            .flat_map(|p| &p.capabilities)
            .map(|c| c.wires.len())
            .sum()
    }

    /// Render the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
