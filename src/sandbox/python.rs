use std::fs;
use std::sync::Arc;

use async_trait::async_trait;

use super::{ExecutionRequest, Interpreter, MemoCell, SandboxAdapter};
use crate::error::ExecError;

static PYTHON_RUNTIME: MemoCell<Interpreter> = MemoCell::new();

/// Runs python programs through a shared `python3 -I` interpreter.
///
/// `-I` keeps the interpreter isolated from site packages and environment
/// variables, so two learners' runs see the same world.
pub struct PythonSandbox;

#[async_trait]
impl SandboxAdapter for PythonSandbox {
    async fn initialize(&self) -> Result<Arc<Interpreter>, ExecError> {
        PYTHON_RUNTIME
            .get_or_build(|| {
                log::info!("Initializing python sandbox");
                Interpreter::probe(&["python3"])
            })
            .await
    }

    async fn execute(&self, request: ExecutionRequest<'_>) -> Result<String, ExecError> {
        let interp = self.initialize().await?;
        let _guard = interp.lock().await;

        let source_path = interp.stage_path("cell", "py");
        fs::write(&source_path, format!("{}\n", request.source.text))
            .map_err(|e| ExecError::Setup(format!("Failed to stage source: {e}")))?;

        let python = interp.tool("python3")?;
        let source_arg = source_path.to_string_lossy().into_owned();
        let result = interp
            .run_command(
                python,
                &["-I", source_arg.as_str()],
                request.stdin,
                request.timeout_ms,
            )
            .await;

        let _ = fs::remove_file(&source_path);
        result
    }

    fn reset(&self) {
        PYTHON_RUNTIME.clear();
    }
}

pub(super) fn build_count() -> u32 {
    PYTHON_RUNTIME.build_count()
}
