use crate::extractor::extract_final_answer;
use crate::tally::VoteTally;
use futures::future::join_all;
use llm::{Generator, SamplingOptions};
use log::warn;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsensusError {
    #[error("no trial produced an answer ({failed} of {trials} trials failed)")]
    NoConsensus { trials: usize, failed: usize },
}

/// The accepted answer plus the full distribution, kept for diagnostics
/// (callers print it when the majority does not match an expectation).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Consensus {
    pub answer: String,
    pub count: usize,
    pub trials: usize,
    pub failed_trials: usize,
    pub tally: VoteTally,
}

/// Runs N independent sampling trials against a generation backend and
/// majority-votes on the extracted answers.
///
/// Trials fan out concurrently but tie-breaks are defined by launch order:
/// `join_all` returns results in the order the futures were created, so the
/// tally sees trial 0 first no matter which trial finished first. A trial
/// that errors or exceeds the per-trial timeout is logged and dropped from
/// the tally denominator; it never aborts the batch.
pub struct ConsensusAggregator<'a> {
    generator: &'a dyn Generator,
    trials: usize,
    trial_timeout: Duration,
}

impl<'a> ConsensusAggregator<'a> {
    pub fn new(generator: &'a dyn Generator, trials: usize, trial_timeout: Duration) -> Self {
        Self {
            generator,
            trials,
            trial_timeout,
        }
    }

    pub async fn aggregate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: &SamplingOptions,
    ) -> Result<Consensus, ConsensusError> {
        if options.temperature == 0.0 {
            warn!("Consensus over zero-temperature trials is degenerate: every trial samples the same completion");
        }

        let attempts = (0..self.trials).map(|_| {
            tokio::time::timeout(
                self.trial_timeout,
                self.generator.generate(system_prompt, user_prompt, options),
            )
        });
        let outcomes = join_all(attempts).await;

        let mut tally = VoteTally::new();
        let mut failed = 0;

        for (trial, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(Ok(completion)) => {
                    let answer = extract_final_answer(&completion);
                    if answer.is_empty() {
                        warn!("Trial {trial} produced an empty completion; not counted");
                    } else {
                        tally.record(trial, &answer);
                    }
                }
                Ok(Err(e)) => {
                    warn!("Trial {trial} failed: {e:#}");
                    failed += 1;
                }
                Err(_) => {
                    warn!(
                        "Trial {trial} timed out after {:?}; treated as failed",
                        self.trial_timeout
                    );
                    failed += 1;
                }
            }
        }

        match tally.majority() {
            Some(majority) => Ok(Consensus {
                answer: majority.answer.clone(),
                count: majority.count,
                trials: self.trials,
                failed_trials: failed,
                tally: tally.clone(),
            }),
            None => Err(ConsensusError::NoConsensus {
                trials: self.trials,
                failed,
            }),
        }
    }
}
