//! Process startup: tracing, server wiring and signal handling.

mod server;
mod tracing_init;

pub use server::{run, shutdown_on_signal};
pub use tracing_init::init_tracing;
