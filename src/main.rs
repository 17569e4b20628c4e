use std::fs;

use anyhow::Context;
use clap::Parser;

use polyjudge::config::{CliArgs, SuiteConfig};
use polyjudge::engine::run_tests;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = CliArgs::parse();
    let SuiteConfig {
        language,
        timeout_ms,
        user_code_file,
        solution_file,
        cases,
    } = cli.to_suite().context("Failed to load suite description")?;
    let timeout_ms = cli.timeout_ms.unwrap_or(timeout_ms);

    let user_code = fs::read_to_string(&user_code_file)
        .with_context(|| format!("Failed to read {user_code_file}"))?;
    let solution_code = match &solution_file {
        Some(path) => fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?,
        None => {
            if cases.iter().any(|c| c.expected_output.is_none()) {
                anyhow::bail!(
                    "Suite has no solution file and at least one case lacks expectedOutput"
                );
            }
            String::new()
        }
    };

    let results = run_tests(&user_code, &cases, &solution_code, &language, timeout_ms).await?;

    let passed = results.iter().filter(|r| r.passed).count();
    for (idx, result) in results.iter().enumerate() {
        let verdict = if result.passed { "passed" } else { "failed" };
        log::info!(
            "Case {} ({}): {verdict}",
            idx + 1,
            result.test_case.description
        );
        if let Some(error) = &result.error {
            log::warn!("Case {} error: {error}", idx + 1);
        }
    }
    log::info!("{passed}/{} cases passed", results.len());

    println!("{}", serde_json::to_string_pretty(&results)?);

    if passed < results.len() {
        std::process::exit(1);
    }
    Ok(())
}
