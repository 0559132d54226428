//! Output validation with bounded whole-pipeline retries.
//!
//! The validator never talks to providers itself. It re-runs an opaque
//! generation task, so every retry walks the full fallback chain again.

pub mod rules;

pub use rules::Assessment;

use std::future::Future;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ForgeError, Result};
use crate::types::{GenerationRequest, ValidationMetadata};

/// Upper bound accepted for `max_attempts`.
pub const MAX_ATTEMPTS_LIMIT: u32 = 10;

/// Retry bound and acceptance threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    /// Generation attempts, including the first.
    pub max_attempts: u32,
    /// Minimum score (0-100) returned without the degraded flag.
    pub threshold: u32,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            threshold: 70,
        }
    }
}

impl ValidationPolicy {
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 || self.max_attempts > MAX_ATTEMPTS_LIMIT {
            return Err(ForgeError::Configuration(format!(
                "validation.max_attempts must be between 1 and {MAX_ATTEMPTS_LIMIT}"
            )));
        }
        if self.threshold > rules::MAX_SCORE {
            return Err(ForgeError::Configuration(format!(
                "validation.threshold must not exceed {}",
                rules::MAX_SCORE
            )));
        }
        Ok(())
    }
}

/// Something the validator can score against its originating request.
pub trait Assess {
    fn assess(&self, request: &GenerationRequest) -> Assessment;
}

/// A result paired with its validation metadata.
#[derive(Debug, Clone)]
pub struct Validated<T> {
    pub value: T,
    pub metadata: ValidationMetadata,
}

#[derive(Debug, Clone)]
pub struct Validator {
    policy: ValidationPolicy,
}

impl Validator {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Run `task` until a result reaches the threshold or attempts run out.
    ///
    /// When attempts run out the best-scoring result is returned with
    /// `degraded` set and an extra warning. An error from the first attempt
    /// is returned as-is; an error from a later attempt falls back to the
    /// best result seen so far.
    pub async fn generate_stable<T, F, Fut>(
        &self,
        request: &GenerationRequest,
        mut task: F,
    ) -> Result<Validated<T>>
    where
        T: Assess,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut best: Option<(T, Assessment)> = None;
        let mut attempts = 0;

        while attempts < self.policy.max_attempts {
            attempts += 1;
            let candidate = match task().await {
                Ok(candidate) => candidate,
                Err(e) if best.is_some() => {
                    warn!(
                        attempt = attempts,
                        error = %e,
                        "regeneration failed, keeping best attempt"
                    );
                    break;
                }
                Err(e) => return Err(e),
            };

            let assessment = candidate.assess(request);
            if assessment.score >= self.policy.threshold {
                info!(attempt = attempts, score = assessment.score, "generation accepted");
                return Ok(Validated {
                    value: candidate,
                    metadata: metadata(assessment, attempts, false),
                });
            }

            warn!(
                attempt = attempts,
                max_attempts = self.policy.max_attempts,
                score = assessment.score,
                threshold = self.policy.threshold,
                "generation below threshold"
            );
            if best.as_ref().map_or(true, |(_, b)| assessment.score > b.score) {
                best = Some((candidate, assessment));
            }
        }

        let Some((value, mut assessment)) = best else {
            return Err(ForgeError::Configuration(
                "validation policy allows no attempts".into(),
            ));
        };
        assessment.warnings.push(format!(
            "score {} below threshold {} after {attempts} attempt(s); best result kept",
            assessment.score, self.policy.threshold
        ));
        Ok(Validated {
            value,
            metadata: metadata(assessment, attempts, true),
        })
    }
}

fn metadata(assessment: Assessment, attempts: u32, degraded: bool) -> ValidationMetadata {
    ValidationMetadata {
        score: assessment.score,
        warnings: assessment.warnings,
        attempts,
        timestamp: Utc::now(),
        degraded,
    }
}
