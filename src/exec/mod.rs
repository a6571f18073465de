// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`command`] holds the validated argv type.
//! - [`copier`] is the byte pump used both by drain tasks and by the file
//!   helpers.
//! - [`launcher`] starts a child and drains its output into caller sinks.
//! - [`capture`] specialises the launcher with in-memory sinks.
//! - [`wait`] defines the `ProcessWait` trait both handle types implement.

pub mod capture;
pub mod command;
pub mod copier;
pub mod launcher;
pub mod wait;

pub use capture::{CapturedOutput, CapturingHandle, capture, launch_capturing};
pub use command::CommandSpec;
pub use copier::{CloseMode, StreamCopier, copy, copy_and_close};
pub use launcher::{Launcher, ProcessHandle, launch, launch_inherited};
pub use wait::ProcessWait;
