use serde::{Deserialize, Serialize};

use crate::error::ExecError;
use crate::harness;
use crate::language::{Language, SourceUnit};
use crate::normalize::normalize_output;
use crate::sandbox::{self, ExecutionRequest, SandboxAdapter};

/// Placeholder returned by [`run_code`] when a program finishes without
/// writing anything.
pub const NO_OUTPUT: &str = "(No output)";

/// One test case as supplied by the content store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub input: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_hidden: Option<bool>,
    /// When present, the reference solution is not run for this case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<String>,
}

/// Outcome of one test case. Created once per case per run, never mutated,
/// returned in input order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub test_case: TestCase,
    pub passed: bool,
    pub actual_output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Runs one source fragment as-is and returns its normalized output.
///
/// The source is not harnessed beyond the standard-I/O declaration check;
/// `stdin` is fed to the program verbatim. Adapter errors propagate
/// unchanged; an unsupported `language` token fails before any sandbox is
/// touched.
pub async fn run_code(
    source: &str,
    language: &str,
    stdin: &str,
    timeout_ms: u64,
) -> Result<String, ExecError> {
    let language: Language = language.parse()?;
    let unit = harness::ensure_io_declaration(&SourceUnit::new(language, source));

    let adapter = sandbox::adapter_for(language);
    let raw = adapter
        .execute(ExecutionRequest {
            source: &unit,
            stdin,
            timeout_ms,
        })
        .await?;

    if raw.is_empty() {
        return Ok(NO_OUTPUT.to_string());
    }
    Ok(normalize_output(&raw))
}

/// Runs every test case independently against the user code and the
/// reference solution.
///
/// A failure in one case is captured into that case's result while the rest
/// of the suite proceeds; only an unsupported `language` token makes the
/// whole call fail. An empty case list short-circuits to `[]` without
/// touching any sandbox.
pub async fn run_tests(
    user_code: &str,
    test_cases: &[TestCase],
    solution_code: &str,
    language: &str,
    timeout_ms: u64,
) -> Result<Vec<TestResult>, ExecError> {
    let language: Language = language.parse()?;
    if test_cases.is_empty() {
        return Ok(Vec::new());
    }

    let user = SourceUnit::new(language, user_code);
    let solution = SourceUnit::new(language, solution_code);

    // Cases run sequentially: the interpreter handle is shared mutable state
    let mut results = Vec::with_capacity(test_cases.len());
    for case in test_cases {
        results.push(run_one_case(&user, &solution, case, timeout_ms).await);
    }
    Ok(results)
}

/// Synthesizes the harness for `unit`, executes it, and normalizes the
/// captured output.
async fn run_harnessed(
    unit: &SourceUnit,
    input: &str,
    timeout_ms: u64,
) -> Result<String, ExecError> {
    let prepared = harness::prepare(unit, input);
    let adapter = sandbox::adapter_for(unit.language);
    let raw = adapter
        .execute(ExecutionRequest {
            source: &prepared.unit,
            stdin: &prepared.stdin,
            timeout_ms,
        })
        .await?;
    Ok(normalize_output(&raw))
}

async fn run_one_case(
    user: &SourceUnit,
    solution: &SourceUnit,
    case: &TestCase,
    timeout_ms: u64,
) -> TestResult {
    let actual = match run_harnessed(user, &case.input, timeout_ms).await {
        Ok(output) => output,
        Err(err) => {
            log::debug!("User program failed on case '{}': {err}", case.description);
            return TestResult {
                test_case: case.clone(),
                passed: false,
                actual_output: String::new(),
                expected_output: None,
                error: Some(err.to_string()),
            };
        }
    };

    let expected = match &case.expected_output {
        Some(text) => normalize_output(text),
        None => match run_harnessed(solution, &case.input, timeout_ms).await {
            Ok(output) => output,
            Err(err) => {
                log::warn!(
                    "Reference solution failed on case '{}': {err}",
                    case.description
                );
                return TestResult {
                    test_case: case.clone(),
                    passed: false,
                    actual_output: actual,
                    expected_output: None,
                    error: Some(format!("Reference solution failed: {err}")),
                };
            }
        },
    };

    TestResult {
        test_case: case.clone(),
        passed: actual == expected,
        actual_output: actual,
        expected_output: Some(expected),
        error: None,
    }
}
