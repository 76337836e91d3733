use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::SuiteError;

use super::traits::TaskTemplate;

/// Flat mapping from template name to template, built once at startup and
/// passed by reference into the suite builder.
#[derive(Clone, Default)]
pub struct TaskRegistry {
    templates: BTreeMap<String, Arc<dyn TaskTemplate>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, template: Arc<dyn TaskTemplate>) -> Result<(), SuiteError> {
        let name = template.name().to_string();
        if self.templates.contains_key(&name) {
            return Err(SuiteError::DuplicateTemplate(name));
        }
        self.templates.insert(name, template);
        Ok(())
    }

    /// Builder-style registration.
    pub fn with(mut self, template: Arc<dyn TaskTemplate>) -> Result<Self, SuiteError> {
        self.register(template)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn TaskTemplate>> {
        self.templates.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn TaskTemplate>)> {
        self.templates.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Union with `other`; on a name clash the entry from `other` wins.
    pub fn merge(&mut self, other: &TaskRegistry) {
        for (name, template) in &other.templates {
            if self.templates.contains_key(name) {
                tracing::debug!(template = %name, "registry merge overrides existing template");
            }
            self.templates.insert(name.clone(), template.clone());
        }
    }
}

enum FamilyDef {
    Tasks(TaskRegistry),
    Union(Vec<String>),
}

/// Named task families. A family is either a registry of its own or the
/// union of other families (e.g. a full suite composed of a primary set and a
/// retrieval subset). The engine only ever sees the flattened registry.
#[derive(Default)]
pub struct FamilyCatalog {
    families: BTreeMap<String, FamilyDef>,
}

impl FamilyCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_family(&mut self, name: impl Into<String>, registry: TaskRegistry) -> &mut Self {
        self.families.insert(name.into(), FamilyDef::Tasks(registry));
        self
    }

    /// Register `name` as the union of `members`, resolved lazily on lookup.
    pub fn add_union<I, S>(&mut self, name: impl Into<String>, members: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let members = members.into_iter().map(Into::into).collect();
        self.families.insert(name.into(), FamilyDef::Union(members));
        self
    }

    pub fn families(&self) -> Vec<&str> {
        self.families.keys().map(String::as_str).collect()
    }

    pub fn get_registry(&self, family: &str) -> Result<TaskRegistry, SuiteError> {
        self.resolve(family, &mut Vec::new())
    }

    fn resolve(&self, family: &str, visiting: &mut Vec<String>) -> Result<TaskRegistry, SuiteError> {
        let def = self
            .families
            .get(family)
            .ok_or_else(|| SuiteError::UnknownFamily(family.to_string()))?;
        match def {
            FamilyDef::Tasks(registry) => Ok(registry.clone()),
            FamilyDef::Union(members) => {
                if visiting.iter().any(|f| f == family) {
                    return Err(SuiteError::UnknownFamily(format!(
                        "{family} (cyclic family composition)"
                    )));
                }
                visiting.push(family.to_string());
                let mut merged = TaskRegistry::new();
                for member in members {
                    merged.merge(&self.resolve(member, visiting)?);
                }
                visiting.pop();
                Ok(merged)
            }
        }
    }
}
