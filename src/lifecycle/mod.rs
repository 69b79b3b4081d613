//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → wait_for_termination resolves
//!
//! Shutdown (shutdown.rs):
//!     trigger → broadcast → server stops accepting → in-flight drain → exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::{wait_for_termination, TerminationSignal};
