pub mod config;
pub mod engine;
pub mod error;
pub mod harness;
pub mod language;
pub mod normalize;
pub mod sandbox;
pub mod signature;

pub use engine::{NO_OUTPUT, TestCase, TestResult, run_code, run_tests};
pub use error::ExecError;
pub use language::{Language, SourceUnit};
pub use sandbox::{clear_native, clear_python};
