use std::any::Any;

use async_trait::async_trait;

use crate::task::TaskInstance;

use super::types::{AgentStep, RunContext};

/// Opaque, stateful device handle. The engine only passes it through; task
/// code downcasts via [`Environment::as_any_mut`] to reach its concrete type.
pub trait Environment: Send {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Downcast helpers so task code reads `env.downcast_mut::<Device>()`.
impl<'a> dyn Environment + 'a {
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// An acting agent. Decision logic is entirely the implementor's business;
/// the runner only drives `reset` once and `step` up to the budget.
#[async_trait]
pub trait Agent: Send {
    fn name(&self) -> &str;

    /// Agent family tag, recorded for reporting.
    fn family(&self) -> &str {
        "default"
    }

    async fn reset(&mut self, env: &mut dyn Environment, go_home: bool) -> anyhow::Result<()>;

    async fn step(
        &mut self,
        env: &mut dyn Environment,
        instance: &TaskInstance,
        ctx: &RunContext,
    ) -> anyhow::Result<AgentStep>;
}
