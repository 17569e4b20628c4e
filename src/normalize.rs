/// Canonicalizes captured program output before comparison.
///
/// Folds platform line endings to `\n`, strips trailing whitespace on each
/// line, and drops trailing blank lines. Interior whitespace is preserved.
/// The operation is idempotent, so normalizing an already-normalized string
/// is a no-op.
pub fn normalize_output(raw: &str) -> String {
    raw.lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}
