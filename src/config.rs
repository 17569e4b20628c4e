use clap::Parser;
use serde::Deserialize;

use crate::engine::TestCase;

#[derive(Parser)]
#[command(name = "polyjudge", version = "1.0", about, long_about = None)]
pub struct CliArgs {
    /// Path to the suite description file
    #[arg(long = "suite", short = 's')]
    pub suite_path: String,

    /// Override the suite's wall-clock budget per execution, in milliseconds
    #[arg(long = "timeout")]
    pub timeout_ms: Option<u64>,
}

impl CliArgs {
    /// Load the suite description from the specified file
    pub fn to_suite(&self) -> std::io::Result<SuiteConfig> {
        let file = std::fs::File::open(&self.suite_path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| e.into())
    }
}

/// One exercise suite: a language, a budget, the submitted sources, and the
/// cases to run them against. Field names match the content store's JSON.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SuiteConfig {
    pub language: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    pub user_code_file: String,
    /// Optional when every case carries its own expected output.
    pub solution_file: Option<String>,
    #[serde(default)]
    pub cases: Vec<TestCase>,
}

fn default_timeout_ms() -> u64 {
    5000
}
