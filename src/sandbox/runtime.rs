use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tempfile::TempDir;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;

use crate::error::ExecError;

/// Shared mutable state for one language family: resolved tool paths, a
/// scratch directory for staged programs, and the lock serializing stateful
/// executions.
pub struct Interpreter {
    tools: Vec<(&'static str, PathBuf)>,
    scratch: TempDir,
    run_seq: parking_lot::Mutex<u32>,
    gate: tokio::sync::Mutex<()>,
}

impl Interpreter {
    /// Resolves every named tool on `PATH` and allocates the scratch
    /// directory. Fails with a setup fault when any tool is missing.
    pub fn probe(tool_names: &[&'static str]) -> Result<Self, ExecError> {
        let mut tools = Vec::with_capacity(tool_names.len());
        for name in tool_names {
            tools.push((*name, resolve_tool(name)?));
        }

        let scratch = TempDir::new()
            .map_err(|e| ExecError::Setup(format!("Failed to create scratch directory: {e}")))?;

        Ok(Self {
            tools,
            scratch,
            run_seq: parking_lot::Mutex::new(0),
            gate: tokio::sync::Mutex::new(()),
        })
    }

    pub fn tool(&self, name: &str) -> Result<&Path, ExecError> {
        self.tools
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, path)| path.as_path())
            .ok_or_else(|| ExecError::Setup(format!("{name} was not probed for this sandbox")))
    }

    /// Serializes executions on this interpreter. Adapters hold the guard for
    /// the whole of one `execute`, compile step included.
    pub async fn lock(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.gate.lock().await
    }

    /// A fresh path in the scratch directory for one staged program.
    pub fn stage_path(&self, stem: &str, ext: &str) -> PathBuf {
        let seq = {
            let mut n = self.run_seq.lock();
            *n += 1;
            *n
        };
        self.scratch.path().join(format!("{stem}_{seq}.{ext}"))
    }

    /// Runs one command to completion, feeding `stdin` and capturing both
    /// output streams, racing the child against the wall-clock budget.
    ///
    /// A child that loses the race is killed when its handle drops; until
    /// then it may still be running, which is why callers hold the execution
    /// lock across the call.
    pub async fn run_command(
        &self,
        program: &Path,
        args: &[&str],
        stdin: &str,
        timeout_ms: u64,
    ) -> Result<String, ExecError> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .current_dir(self.scratch.path());

        let mut child = cmd
            .spawn()
            .map_err(|e| ExecError::Setup(format!("Failed to spawn {}: {e}", program.display())))?;

        if let Some(mut pipe) = child.stdin.take() {
            // The child may exit without reading; a broken pipe is not a fault
            let _ = pipe.write_all(stdin.as_bytes()).await;
            let _ = pipe.shutdown().await;
        }

        match timeout(Duration::from_millis(timeout_ms), child.wait_with_output()).await {
            Ok(Ok(output)) => {
                if output.status.success() {
                    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    Err(ExecError::Runtime(
                        format!("{stderr}\n{stdout}").trim().to_string(),
                    ))
                }
            }
            Ok(Err(e)) => Err(ExecError::Runtime(format!("Process error: {e}"))),
            Err(_) => Err(ExecError::Timeout(timeout_ms)),
        }
    }
}

fn resolve_tool(name: &str) -> Result<PathBuf, ExecError> {
    let output = std::process::Command::new("which")
        .arg(name)
        .output()
        .map_err(|e| ExecError::Setup(format!("Failed to probe for {name}: {e}")))?;

    if !output.status.success() {
        return Err(ExecError::Setup(format!("{name} not found on PATH")));
    }

    let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if path.is_empty() {
        return Err(ExecError::Setup(format!(
            "which {name} produced empty output"
        )));
    }
    Ok(PathBuf::from(path))
}
