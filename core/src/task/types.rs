use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::traits::TaskTemplate;

/// Generated task parameters. Keys are unique and iterate in sorted order, so
/// two parameter sets compare (and serialize) byte-identically when equal.
pub type Params = BTreeMap<String, serde_json::Value>;

/// Parameter key under which the generating seed is recorded.
pub const SEED_PARAM: &str = "seed";

/// Joins template name and instance index in identities and checkpoint names.
pub const INSTANCE_SEPARATOR: &str = "_";

/// Stable key for checkpoint lookups: `(template_name, combination_index)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstanceIdentity {
    pub template_name: String,
    pub index: usize,
}

impl InstanceIdentity {
    pub fn new(template_name: impl Into<String>, index: usize) -> Self {
        Self {
            template_name: template_name.into(),
            index,
        }
    }
}

impl fmt::Display for InstanceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.template_name, INSTANCE_SEPARATOR, self.index)
    }
}

/// A template bound to concrete parameters.
#[derive(Clone)]
pub struct TaskInstance {
    template: Arc<dyn TaskTemplate>,
    pub template_name: String,
    pub params: Params,
    pub seed: Option<u64>,
    pub complexity: f64,
    pub goal: String,
    pub start_on_home_screen: bool,
}

impl TaskInstance {
    pub(crate) fn new(template: Arc<dyn TaskTemplate>, params: Params, seed: Option<u64>) -> Self {
        let goal = template.goal(&params);
        Self {
            template_name: template.name().to_string(),
            complexity: template.complexity(),
            start_on_home_screen: template.start_on_home_screen(),
            template,
            params,
            seed,
            goal,
        }
    }

    pub fn template(&self) -> &Arc<dyn TaskTemplate> {
        &self.template
    }

    pub fn identity(&self, index: usize) -> InstanceIdentity {
        InstanceIdentity::new(self.template_name.clone(), index)
    }

    pub fn param(&self, key: &str) -> Option<&serde_json::Value> {
        self.params.get(key)
    }
}

impl fmt::Debug for TaskInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskInstance")
            .field("template_name", &self.template_name)
            .field("params", &self.params)
            .field("seed", &self.seed)
            .field("complexity", &self.complexity)
            .field("goal", &self.goal)
            .finish()
    }
}
