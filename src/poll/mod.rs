//! Consistency polling module
//!
//! Read-after-write support for an eventually consistent search index.
//!
//! # Overview
//!
//! After a write, the search index may lag behind the store. The poller
//! repeats a search until the index reports the expected number of hits or
//! the attempt budget runs out, pausing a fixed interval between attempts.
//!
//! ```text
//! Polling(1) ──converged──▶ Converged
//!     │
//!     ├─ not converged, attempts left ──pause──▶ Polling(n+1)
//!     │
//!     └─ not converged, budget spent ──────────▶ Exhausted
//! ```
//!
//! Both terminal states hand back the last fetched value untouched. Callers
//! must re-check the count (or `PollOutcome::state`) before trusting it.

mod poller;
mod policy;
mod sleeper;

pub use poller::{ConsistencyPoller, Expectation, PollOutcome, PollState};
pub use policy::RetryPolicy;
pub use sleeper::{InterruptHandle, InterruptSignal, SleepOutcome, Sleeper, TokioSleeper};
