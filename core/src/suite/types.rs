use std::collections::BTreeMap;

use crate::error::SuiteError;
use crate::task::{InstanceIdentity, TaskInstance};

/// Template name to its ordered instances. Iteration is lexicographic by
/// template name and then by index, so repeated runs visit instances in the
/// same order.
#[derive(Debug, Clone, Default)]
pub struct Suite {
    instances: BTreeMap<String, Vec<TaskInstance>>,
    family: Option<String>,
}

impl Suite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Family label. Reading it before it has been set is an error.
    pub fn family(&self) -> Result<&str, SuiteError> {
        self.family.as_deref().ok_or(SuiteError::FamilyNotSet)
    }

    pub fn set_family(&mut self, family: impl Into<String>) {
        self.family = Some(family.into());
    }

    pub fn insert(&mut self, template_name: impl Into<String>, instances: Vec<TaskInstance>) {
        self.instances.insert(template_name.into(), instances);
    }

    pub fn get(&self, template_name: &str) -> Option<&[TaskInstance]> {
        self.instances.get(template_name).map(Vec::as_slice)
    }

    pub fn template_names(&self) -> impl Iterator<Item = &str> {
        self.instances.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TaskInstance])> {
        self.instances
            .iter()
            .map(|(name, instances)| (name.as_str(), instances.as_slice()))
    }

    /// Every instance with its identity, in run order.
    pub fn identities(&self) -> impl Iterator<Item = (InstanceIdentity, &TaskInstance)> {
        self.iter().flat_map(|(name, instances)| {
            instances
                .iter()
                .enumerate()
                .map(move |(i, instance)| (InstanceIdentity::new(name, i), instance))
        })
    }

    /// Number of templates (keys), including ones with no instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn total_instances(&self) -> usize {
        self.instances.values().map(Vec::len).sum()
    }
}
