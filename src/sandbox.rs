mod cell;
mod native;
mod python;
mod runtime;

pub use cell::MemoCell;
pub use runtime::Interpreter;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ExecError;
use crate::language::{Language, SourceUnit};

/// The unit of work handed to a sandbox adapter.
///
/// Has no identity beyond the call; adapters retain nothing across requests
/// except the shared interpreter handle.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionRequest<'a> {
    pub source: &'a SourceUnit,
    pub stdin: &'a str,
    pub timeout_ms: u64,
}

/// Uniform capability surface over one language family's interpreter.
///
/// Implementations own a process-wide, lazily-built interpreter handle and
/// serialize executions on it, so callers may issue `execute` concurrently
/// without interleaving I/O reads.
#[async_trait]
pub trait SandboxAdapter: Send + Sync {
    /// Returns the shared interpreter handle, constructing it on first use.
    ///
    /// Idempotent and memoized; concurrent callers during construction all
    /// land on the same in-flight build.
    async fn initialize(&self) -> Result<Arc<Interpreter>, ExecError>;

    /// Runs one program to completion under a wall-clock budget, feeding
    /// `stdin` to its input stream and capturing everything it writes.
    async fn execute(&self, request: ExecutionRequest<'_>) -> Result<String, ExecError>;

    /// Drops the memoized interpreter handle; the next `initialize` rebuilds
    /// it. The only cancellation primitive there is.
    fn reset(&self);
}

/// Selects the adapter for a language family.
///
/// `c` and `cpp` are served by the one native family.
pub fn adapter_for(language: Language) -> &'static dyn SandboxAdapter {
    match language {
        Language::Python => &python::PythonSandbox,
        Language::C | Language::Cpp => &native::NativeSandbox,
    }
}

/// Idempotent reset of the python singleton; safe before any initialization.
pub fn clear_python() {
    python::PythonSandbox.reset();
}

/// Idempotent reset of the native (C/C++) singleton; safe before any
/// initialization.
pub fn clear_native() {
    native::NativeSandbox.reset();
}

/// Number of python interpreter constructions so far in this process.
pub fn python_build_count() -> u32 {
    python::build_count()
}

/// Number of native-toolchain constructions so far in this process.
pub fn native_build_count() -> u32 {
    native::build_count()
}
