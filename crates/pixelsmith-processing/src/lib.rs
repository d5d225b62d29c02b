//! Resource availability probing and convergence polling.
//!
//! A [`Prober`] answers "is it there yet?" once. [`poll_until_ready`] keeps asking
//! under a bounded exponential backoff until the answer is yes, the remote job
//! reports failure, the attempt budget runs out, or the caller cancels.

pub mod error;
pub mod poller;
pub mod probe;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use error::PollError;
pub use poller::{poll_resource, poll_until_ready};
pub use probe::{HttpProber, Prober, TranscriptionStatusProber};
pub use tokio_util::sync::CancellationToken;
