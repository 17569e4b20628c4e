use std::fs;
use std::sync::Arc;

use async_trait::async_trait;

use super::{ExecutionRequest, Interpreter, MemoCell, SandboxAdapter};
use crate::error::ExecError;
use crate::language::Language;

static NATIVE_RUNTIME: MemoCell<Interpreter> = MemoCell::new();

// Compilation is not part of the caller's execution budget
const COMPILE_TIMEOUT_MS: u64 = 30_000;

/// Runs C and C++ programs by compiling them with the system toolchain and
/// executing the produced binary.
///
/// Compiler diagnostics surface as runtime faults, the same way an embedded
/// interpreter would raise a syntax error at run time.
pub struct NativeSandbox;

#[async_trait]
impl SandboxAdapter for NativeSandbox {
    async fn initialize(&self) -> Result<Arc<Interpreter>, ExecError> {
        NATIVE_RUNTIME
            .get_or_build(|| {
                log::info!("Initializing native (C/C++) sandbox");
                Interpreter::probe(&["cc", "c++"])
            })
            .await
    }

    async fn execute(&self, request: ExecutionRequest<'_>) -> Result<String, ExecError> {
        let interp = self.initialize().await?;
        let _guard = interp.lock().await;

        let (compiler, ext) = match request.source.language {
            Language::Cpp => ("c++", "cpp"),
            _ => ("cc", "c"),
        };

        let source_path = interp.stage_path("cell", ext);
        let binary_path = source_path.with_extension("bin");
        fs::write(&source_path, format!("{}\n", request.source.text))
            .map_err(|e| ExecError::Setup(format!("Failed to stage source: {e}")))?;

        let source_arg = source_path.to_string_lossy().into_owned();
        let binary_arg = binary_path.to_string_lossy().into_owned();

        let compile = interp
            .run_command(
                interp.tool(compiler)?,
                &[source_arg.as_str(), "-o", binary_arg.as_str(), "-lm"],
                "",
                COMPILE_TIMEOUT_MS,
            )
            .await;

        let result = match compile {
            Ok(_) => {
                interp
                    .run_command(&binary_path, &[], request.stdin, request.timeout_ms)
                    .await
            }
            Err(err) => Err(err),
        };

        let _ = fs::remove_file(&source_path);
        let _ = fs::remove_file(&binary_path);
        result
    }

    fn reset(&self) {
        NATIVE_RUNTIME.clear();
    }
}

pub(super) fn build_count() -> u32 {
    NATIVE_RUNTIME.build_count()
}
