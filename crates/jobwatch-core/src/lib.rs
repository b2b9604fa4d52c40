pub mod config;
pub mod logging;

pub mod fetch;
pub mod job;
pub mod poll;
pub mod stage;
pub mod submit;

#[cfg(test)]
pub(crate) mod testing;
