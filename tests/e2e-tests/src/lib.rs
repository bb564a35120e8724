//! End-to-end test support for the sandbox benchmark.
//!
//! Tests run the real hyper client, operations and harness against
//! [`MockSandbox`], an axum server bound to an ephemeral localhost port.

pub mod assertions;
pub mod fixtures;

pub use mock_sandbox::{FailureMode, MockOptions, MockSandbox};
