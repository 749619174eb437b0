use async_trait::async_trait;
use futures::future::join_all;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use oracle_core::sanitize;

use super::{Adjudicator, Principle, ProducingStep};
use crate::RuntimeError;

/// Replicates a step across `validators` runs and requires `quorum` of them
/// to agree with the leader.
///
/// The first run is the leader's. Each other run is sanitized and compared
/// with the leader's output on the principle's exact fields. A leader
/// failure propagates; a validator failure counts as disagreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorQuorum {
    validators: usize,
    quorum: usize,
}

impl ValidatorQuorum {
    /// `quorum` is clamped to `1..=validators`, and `validators` to at least 1.
    pub fn new(validators: usize, quorum: usize) -> Self {
        let validators = validators.max(1);
        Self {
            validators,
            quorum: quorum.clamp(1, validators),
        }
    }

    /// Simple majority of `validators`.
    pub fn majority(validators: usize) -> Self {
        Self::new(validators, validators / 2 + 1)
    }

    pub fn validators(&self) -> usize {
        self.validators
    }

    pub fn quorum(&self) -> usize {
        self.quorum
    }
}

fn agrees(leader: &Map<String, Value>, other: &Map<String, Value>, principle: &Principle) -> bool {
    principle
        .exact_fields
        .iter()
        .all(|field| leader.get(field) == other.get(field))
}

#[async_trait]
impl Adjudicator for ValidatorQuorum {
    async fn run_comparative(
        &self,
        step: &dyn ProducingStep,
        principle: &Principle,
    ) -> Result<String, RuntimeError> {
        let leader_raw = step.produce().await?;
        let leader = sanitize(&leader_raw)?;

        let runs = join_all((1..self.validators).map(|_| step.produce())).await;

        let mut agreeing = 1;
        for (i, run) in runs.into_iter().enumerate() {
            let validator = i + 1;
            let verdict = match run {
                Ok(raw) => sanitize(&raw),
                Err(e) => {
                    warn!(validator, error = %e, "Validator run failed");
                    continue;
                }
            };
            match verdict {
                Ok(map) if agrees(&leader, &map, principle) => agreeing += 1,
                Ok(_) => warn!(validator, "Validator disagrees with leader"),
                Err(e) => warn!(validator, error = %e, "Validator output unparseable"),
            }
        }

        debug!(
            agreeing,
            required = self.quorum,
            validators = self.validators,
            "Comparative run finished"
        );

        if agreeing >= self.quorum {
            Ok(leader_raw)
        } else {
            Err(RuntimeError::NoConsensus {
                agreeing,
                required: self.quorum,
                validators: self.validators,
            })
        }
    }

    fn name(&self) -> &str {
        "quorum"
    }
}
