use std::sync::OnceLock;

use regex::Regex;

use crate::language::{Language, SourceUnit};
use crate::signature::{self, CallableSignature, ValueKind};

/// A self-contained program prepared for a sandbox, plus the stdin stream it
/// should be fed.
#[derive(Debug, Clone)]
pub struct PreparedProgram {
    pub unit: SourceUnit,
    pub stdin: String,
}

static PY_SCRATCH_RE: OnceLock<Regex> = OnceLock::new();

// Top-level scratch invocations learners leave behind while experimenting.
fn py_scratch_re() -> &'static Regex {
    PY_SCRATCH_RE
        .get_or_init(|| Regex::new(r"^(?:print\s*\(|result\s*=|assert\b)").expect("valid pattern"))
}

/// Turns a possibly-bare source fragment into a runnable program fed by the
/// test case's `input`.
///
/// Sources that read stdin, or that already define the conventional entry
/// point, pass through with `input` rendered as a stdin buffer. Otherwise the
/// first detected callable gets a synthesized entry point invoking it with
/// literalized arguments. Fragments where nothing is detected also pass
/// through; the sandbox surfaces whatever the interpreter makes of them.
pub fn prepare(unit: &SourceUnit, input: &str) -> PreparedProgram {
    if signature::reads_stdin(unit) || signature::has_entry_point(unit) {
        return PreparedProgram {
            unit: ensure_io_declaration(unit),
            stdin: stdin_buffer(input),
        };
    }

    match signature::parse_signature(unit) {
        Some(sig) => {
            let args = literalize_arguments(input, &sig);
            PreparedProgram {
                unit: synthesize(unit, &sig, &args),
                stdin: String::new(),
            }
        }
        None => PreparedProgram {
            unit: ensure_io_declaration(unit),
            stdin: stdin_buffer(input),
        },
    }
}

/// Pass-through preparation: the source runs unmodified apart from the
/// standard-I/O declaration, which is inserted at most once.
pub fn ensure_io_declaration(unit: &SourceUnit) -> SourceUnit {
    match unit.language {
        Language::Python => unit.clone(),
        Language::C | Language::Cpp => {
            SourceUnit::new(unit.language, ensure_stdio_include(&unit.text))
        }
    }
}

fn ensure_stdio_include(text: &str) -> String {
    if text.contains("#include <stdio.h>") || text.contains("#include<stdio.h>") {
        text.to_string()
    } else {
        format!("#include <stdio.h>\n{text}")
    }
}

/// Builds the stdin stream for a program that reads standard input.
///
/// Inputs that already contain newlines pass through untouched; otherwise
/// top-level commas become line breaks, so `"6, 7"` feeds two reads. A
/// trailing newline is ensured for non-empty buffers.
pub fn stdin_buffer(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }
    let mut buf = if input.contains('\n') {
        input.to_string()
    } else {
        signature::split_top_level(input).join("\n")
    };
    if !buf.ends_with('\n') {
        buf.push('\n');
    }
    buf
}

/// Splits a comma-delimited input string into one trimmed literal expression
/// per parameter, order preserving. No coercion is attempted; the target
/// sandbox's own parser decides what the literals mean.
///
/// A zero-parameter callable always yields an empty argument list, even when
/// the input string is non-empty.
pub fn literalize_arguments(input: &str, sig: &CallableSignature) -> Vec<String> {
    if sig.params.is_empty() {
        return Vec::new();
    }
    signature::split_top_level(input)
}

fn synthesize(unit: &SourceUnit, sig: &CallableSignature, args: &[String]) -> SourceUnit {
    let text = match unit.language {
        Language::Python => synthesize_python(&unit.text, sig, args),
        Language::C | Language::Cpp => synthesize_c(&unit.text, sig, args),
    };
    SourceUnit::new(unit.language, text)
}

/// printf directive for a return kind. Unrecognized type phrases have already
/// collapsed to `Int` at classification time, so `%d` doubles as the
/// documented fallback.
fn print_directive(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Int => "%d",
        ValueKind::Wide => "%ld",
        ValueKind::Float => "%g",
        ValueKind::Char => "%c",
        ValueKind::Text => "%s",
        ValueKind::Void => "",
    }
}

fn synthesize_c(text: &str, sig: &CallableSignature, args: &[String]) -> String {
    let body = ensure_stdio_include(text);
    let call = format!("{}({})", sig.name, args.join(", "));
    let entry = match sig.return_kind {
        ValueKind::Void => format!("int main(void) {{\n    {call};\n    return 0;\n}}\n"),
        kind => format!(
            "int main(void) {{\n    printf(\"{}\", {call});\n    return 0;\n}}\n",
            print_directive(kind)
        ),
    };
    format!("{body}\n\n{entry}")
}

fn synthesize_python(text: &str, sig: &CallableSignature, args: &[String]) -> String {
    let body = strip_scratch_calls(text);
    let call = format!("{}({})", sig.name, args.join(", "));
    format!("{body}\n\nprint({call})\n")
}

// Drops top-level probe lines (`print(...)`, `result = ...`, bare asserts) so
// the synthesized entry point's output is the only thing captured. Indented
// lines are left alone.
fn strip_scratch_calls(text: &str) -> String {
    let re = py_scratch_re();
    text.lines()
        .filter(|line| !re.is_match(line))
        .collect::<Vec<_>>()
        .join("\n")
}
