//! CLI command handlers, one file per subcommand.

mod cancel;
mod status;
mod submit;
mod wait;
mod watch;

pub use cancel::run_cancel;
pub use status::run_status;
pub use submit::run_submit;
pub use wait::run_wait;
pub use watch::run_watch;
#[cfg(test)]
pub(crate) use watch::stop_watching;
