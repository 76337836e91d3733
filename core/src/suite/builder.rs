use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SuiteError;
use crate::task::{Params, TaskInstance, TaskRegistry, TaskTemplate, SEED_PARAM};
use crate::util::instance_seed;

use super::filter::validate_filter;
use super::types::Suite;

/// Inputs to [`build_suite`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteOptions {
    /// Instances per template.
    pub n_task_combinations: usize,
    pub seed: Option<u64>,
    /// Restrict the suite to these templates; empty means all.
    pub tasks: Vec<String>,
    pub use_identical_params: bool,
    pub family: Option<String>,
}

impl Default for SuiteOptions {
    fn default() -> Self {
        Self {
            n_task_combinations: 1,
            seed: None,
            tasks: Vec::new(),
            use_identical_params: false,
            family: None,
        }
    }
}

/// Bind `template` to parameters.
///
/// Explicit `params` are used verbatim. Otherwise the generator is called
/// once with an rng seeded from `seed` (or from OS entropy when `seed` is
/// `None`) and the seed is recorded under [`SEED_PARAM`].
pub fn instantiate(
    template: &Arc<dyn TaskTemplate>,
    params: Option<Params>,
    seed: Option<u64>,
) -> Result<TaskInstance, SuiteError> {
    let complexity = template.complexity();
    if !complexity.is_finite() || complexity <= 0.0 {
        return Err(SuiteError::InvalidComplexity {
            template: template.name().to_string(),
            value: complexity,
        });
    }

    let params = match params {
        Some(params) => params,
        None => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let mut params = template.generate_params(&mut rng).map_err(|source| {
                SuiteError::Generation {
                    template: template.name().to_string(),
                    index: 0,
                    source,
                }
            })?;
            params.insert(SEED_PARAM.to_string(), seed.map_or(Value::Null, Value::from));
            params
        }
    };

    Ok(TaskInstance::new(template.clone(), params, seed))
}

/// Instantiate `n_task_combinations` instances of each selected template.
///
/// The filter is validated before anything is generated, and only the
/// selected templates are instantiated. Because every seed depends only on
/// `(base seed, template name, index)`, this yields the same instances as
/// generating everything and filtering afterwards.
pub fn build_suite(registry: &TaskRegistry, opts: &SuiteOptions) -> Result<Suite, SuiteError> {
    validate_filter(registry, &opts.tasks)?;

    let mut suite = Suite::new();
    for (name, template) in registry.iter() {
        if !opts.tasks.is_empty() && !opts.tasks.iter().any(|t| t == name) {
            continue;
        }

        let mut instances = Vec::with_capacity(opts.n_task_combinations);
        for index in 0..opts.n_task_combinations {
            let seed = instance_seed(opts.seed, name, index, opts.use_identical_params);
            let instance = instantiate(template, None, seed).map_err(|e| match e {
                SuiteError::Generation {
                    template, source, ..
                } => SuiteError::Generation {
                    template,
                    index,
                    source,
                },
                other => other,
            })?;
            instances.push(instance);
        }
        tracing::debug!(template = name, instances = instances.len(), "instantiated template");
        suite.insert(name, instances);
    }

    if let Some(family) = &opts.family {
        suite.set_family(family.clone());
    }
    Ok(suite)
}
