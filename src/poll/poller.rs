//! Bounded-retry combinator
//!
//! One loop serves every cardinality check: callers supply the fetch and a
//! convergence predicate, the poller owns the attempt budget and the pauses.

use super::policy::RetryPolicy;
use super::sleeper::{SleepOutcome, Sleeper, TokioSleeper};
use crate::error::{Error, Result};
use crate::models::Counted;
use crate::types::InterruptPolicy;
use std::future::Future;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Cardinality a search must report before it counts as consistent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    /// Exactly `n` hits (bulk lookup by an explicit reference list)
    Exact(u64),
    /// Exactly one hit (lookup of one aggregate record by reference)
    Singleton,
}

impl Expectation {
    /// Expect one hit per requested reference
    pub fn one_per<T>(references: &[T]) -> Self {
        Self::Exact(references.len() as u64)
    }

    /// The expected hit count
    pub fn count(&self) -> u64 {
        match self {
            Self::Exact(n) => *n,
            Self::Singleton => 1,
        }
    }
}

/// Terminal state of a poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// The last result satisfied the predicate
    Converged,
    /// The attempt budget ran out first
    Exhausted,
}

/// What a poll observed
#[derive(Debug, Clone, PartialEq)]
pub struct PollOutcome<R> {
    /// Last fetched value, unmodified; `None` if the backend returned no body
    pub result: Option<R>,
    /// Number of fetches made
    pub attempts: u32,
    /// How the poll ended
    pub state: PollState,
}

impl<R> PollOutcome<R> {
    /// Whether the poll converged
    pub fn is_converged(&self) -> bool {
        self.state == PollState::Converged
    }

    /// Take the last fetched value
    pub fn into_result(self) -> Option<R> {
        self.result
    }
}

/// Repeats a search until it converges or the retry budget is spent
#[derive(Clone)]
pub struct ConsistencyPoller {
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl ConsistencyPoller {
    /// Create a poller with an explicit sleep primitive
    pub fn new(policy: RetryPolicy, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { policy, sleeper }
    }

    /// Create a poller that pauses in real time
    pub fn with_policy(policy: RetryPolicy) -> Self {
        Self::new(policy, Arc::new(TokioSleeper::new()))
    }

    /// The retry budget
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `fetch` until `converged` accepts its result or attempts run out
    ///
    /// `fetch` receives the 1-based attempt number. A fetch error ends the
    /// poll immediately; only an absent or non-converging result is retried.
    /// No pause follows the final attempt.
    pub async fn poll_until<R, F, Fut, P>(
        &self,
        mut fetch: F,
        mut converged: P,
    ) -> Result<PollOutcome<R>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<Option<R>>>,
        P: FnMut(&R) -> bool,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            info!(attempt, max_attempts, "polling search index");
            let result = fetch(attempt).await?;

            if result.as_ref().is_some_and(|r| converged(r)) {
                return Ok(PollOutcome {
                    result,
                    attempts: attempt,
                    state: PollState::Converged,
                });
            }

            if attempt >= max_attempts {
                warn!(
                    attempts = attempt,
                    found = result.is_some(),
                    "search index did not converge, returning last result"
                );
                return Ok(PollOutcome {
                    result,
                    attempts: attempt,
                    state: PollState::Exhausted,
                });
            }

            if self.sleeper.sleep(self.policy.interval).await == SleepOutcome::Interrupted {
                error!(attempt, "pause between search attempts was interrupted");
                if self.policy.on_interrupt == InterruptPolicy::Abort {
                    return Err(Error::PollInterrupted { attempt });
                }
            }

            attempt += 1;
        }
    }

    /// Poll until the reported total matches `expectation`
    pub async fn poll_until_count<R, F, Fut>(
        &self,
        fetch: F,
        expectation: Expectation,
    ) -> Result<PollOutcome<R>>
    where
        R: Counted,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<Option<R>>>,
    {
        let expected = expectation.count();
        self.poll_until(fetch, |result: &R| {
            let total = result.total();
            info!(total, expected, "checking size found");
            total == expected
        })
        .await
    }
}

impl std::fmt::Debug for ConsistencyPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsistencyPoller")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
