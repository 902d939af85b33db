pub(crate) mod bootstrap;
mod console;
mod dialog;
pub(crate) mod loop_runner;
mod render;
