pub(crate) mod bootstrap;
mod climb;
pub(crate) mod loop_runner;
