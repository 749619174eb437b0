//! Equivalence-principle adjudication.
//!
//! Every non-deterministic step (fetch a page, ask a model) is wrapped in a
//! [`ProducingStep`] and handed to an [`Adjudicator`]. The adjudicator runs
//! the step on each validator and returns one canonical output only if
//! enough validators agree under the [`Principle`]. Nothing downstream ever
//! sees a value that was not agreed on.

use async_trait::async_trait;

use crate::RuntimeError;

mod quorum;
mod single;

pub use quorum::ValidatorQuorum;
pub use single::SingleValidator;

/// What "the same answer" means across validators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principle {
    /// Natural-language statement shown to validators
    pub statement: String,

    /// Top-level JSON fields that must be exactly equal
    pub exact_fields: Vec<String>,
}

impl Principle {
    pub fn new<I, S>(statement: impl Into<String>, exact_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            statement: statement.into(),
            exact_fields: exact_fields.into_iter().map(Into::into).collect(),
        }
    }

    /// `outcome` must match exactly; everything else only needs to be similar.
    pub fn outcome_exact() -> Self {
        Self::new(
            "`outcome` field must be exactly the same. All other fields must be similar",
            ["outcome"],
        )
    }
}

/// One validator's run of a non-deterministic step.
#[async_trait]
pub trait ProducingStep: Send + Sync {
    /// Produce raw model text.
    async fn produce(&self) -> Result<String, RuntimeError>;
}

/// Runs a step across validators and settles on one output.
#[async_trait]
pub trait Adjudicator: Send + Sync {
    /// Run `step` comparatively and return the canonical output.
    ///
    /// Fails with [`RuntimeError::NoConsensus`] when validators disagree.
    async fn run_comparative(
        &self,
        step: &dyn ProducingStep,
        principle: &Principle,
    ) -> Result<String, RuntimeError>;

    /// Adjudicator name for logs.
    fn name(&self) -> &str;
}
