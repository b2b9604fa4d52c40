//! Job polling engine.
//!
//! Two ways to track a job: `wait_for_job` awaits a terminal outcome and
//! returns it, `watch` runs the same state machine in a background task and
//! reports every snapshot through a `PollObserver`. Both share `PollSession`
//! for interval growth, the interval-accumulated timeout budget, and the
//! consecutive-failure count.

mod error;
mod observer;
mod policy;
mod stop;
mod wait;
mod watch;

pub use error::{CallbackError, PollError, DEFAULT_FAILURE_MESSAGE};
pub use observer::{Callbacks, ChannelObserver, PollEvent, PollObserver};
pub use policy::{PollConfig, PollSession, RetryDecision};
pub use stop::Stopper;
pub use wait::wait_for_job;
pub use watch::{watch, watch_channel, PollHandle};
