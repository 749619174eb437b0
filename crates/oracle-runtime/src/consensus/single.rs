use async_trait::async_trait;
use tracing::debug;

use super::{Adjudicator, Principle, ProducingStep};
use crate::RuntimeError;

/// Runs the step once and accepts its output.
///
/// For local runs and leader-only evaluation, where there is no one to
/// disagree with.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleValidator;

#[async_trait]
impl Adjudicator for SingleValidator {
    async fn run_comparative(
        &self,
        step: &dyn ProducingStep,
        principle: &Principle,
    ) -> Result<String, RuntimeError> {
        debug!(principle = %principle.statement, "Running step on a single validator");
        step.produce().await
    }

    fn name(&self) -> &str {
        "single"
    }
}
