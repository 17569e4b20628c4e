use thiserror::Error;

/// Failure kinds surfaced by the execution harness.
///
/// `Runtime` carries the interpreter's own diagnostics verbatim so the UI can
/// show them to the learner; `Timeout` is kept distinct so a hung program is
/// never reported as a crash.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The caller asked for a language outside the supported closed set.
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// The harness could not produce or stage a runnable program.
    #[error("Setup failed: {0}")]
    Setup(String),

    /// The interpreter raised during execution (syntax errors, undefined
    /// references, nonzero exit).
    #[error("{0}")]
    Runtime(String),

    /// Execution exceeded the caller-specified wall-clock budget.
    #[error("Execution timed out after {0}ms")]
    Timeout(u64),
}
