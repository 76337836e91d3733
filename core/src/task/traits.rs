use std::sync::Arc;

use async_trait::async_trait;
use rand::rngs::StdRng;

use crate::episode::Environment;

use super::types::{Params, TaskInstance};

/// Predicate over environment state that ends an episode early.
pub type TerminationFn = Arc<dyn Fn(&dyn Environment) -> bool + Send + Sync>;

#[async_trait]
pub trait TaskTemplate: Send + Sync {
    /// Registry name; also the first half of every instance identity.
    fn name(&self) -> &str;

    /// Positive difficulty score. The step budget is `round(10 * complexity)`.
    fn complexity(&self) -> f64;

    fn start_on_home_screen(&self) -> bool {
        false
    }

    /// Draw one parameter set. Must only use `rng` for randomness so that a
    /// seeded rng reproduces the same parameters.
    fn generate_params(&self, rng: &mut StdRng) -> anyhow::Result<Params>;

    fn goal(&self, params: &Params) -> String;

    async fn initialize(
        &self,
        _instance: &TaskInstance,
        _env: &mut dyn Environment,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    /// Success signal in `[0, 1]`.
    async fn is_successful(
        &self,
        instance: &TaskInstance,
        env: &mut dyn Environment,
    ) -> anyhow::Result<f64>;

    async fn tear_down(
        &self,
        _instance: &TaskInstance,
        _env: &mut dyn Environment,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    fn termination_fn(&self) -> Option<TerminationFn> {
        None
    }
}
