//! Concurrent-initialization guarantee, in its own binary so this process's
//! construction counter reflects only what happens here.

use polyjudge::language::Language;
use polyjudge::sandbox::{SandboxAdapter, adapter_for, python_build_count};

fn have(tool: &str) -> bool {
    std::process::Command::new("which")
        .arg(tool)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_initialize_constructs_exactly_one_interpreter() {
    if !have("python3") {
        eprintln!("python3 not found, skipping");
        return;
    }

    assert_eq!(python_build_count(), 0);

    let mut handles = Vec::new();
    for _ in 0..16 {
        handles.push(tokio::spawn(async {
            adapter_for(Language::Python).initialize().await
        }));
    }

    let mut first_handle = None;
    for handle in handles {
        let interp = handle.await.unwrap().unwrap();
        let ptr = std::sync::Arc::as_ptr(&interp);
        match first_handle {
            None => first_handle = Some(ptr),
            Some(seen) => assert_eq!(seen, ptr),
        }
    }

    assert_eq!(python_build_count(), 1);
}
