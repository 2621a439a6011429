//! Addresses produced by a deployment run.

use alloy_core::primitives::Address;
use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::StepId;

/// Step id to deployed address, in the order the steps completed.
///
/// Entries are only ever appended, and only by the sequencer running the plan.
/// Serializes as a JSON object whose keys keep deployment order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeploymentResult {
    entries: Vec<(StepId, Address)>,
}

impl DeploymentResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Address deployed by the step with the given id.
    pub fn get(&self, id: &str) -> Option<Address> {
        self.entries
            .iter()
            .find(|(step, _)| step.as_str() == id)
            .map(|(_, address)| *address)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in completion order.
    pub fn iter(&self) -> impl Iterator<Item = (&StepId, Address)> {
        self.entries.iter().map(|(step, address)| (step, *address))
    }

    /// Step ids in completion order.
    pub fn steps(&self) -> impl Iterator<Item = &StepId> {
        self.entries.iter().map(|(step, _)| step)
    }

    pub(crate) fn record(&mut self, step: StepId, address: Address) {
        debug_assert!(!self.contains(step.as_str()), "step recorded twice");
        self.entries.push((step, address));
    }
}

impl Serialize for DeploymentResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (step, address) in &self.entries {
            map.serialize_entry(step, address)?;
        }
        map.end()
    }
}
