#![allow(dead_code, unused_imports)]

pub use procharness_test_utils::builders::{ShellScript, interleaved_expectation};
pub use procharness_test_utils::{init_tracing, payload, with_timeout};
