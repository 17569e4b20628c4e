use std::sync::OnceLock;

use regex::Regex;

use crate::language::{Language, SourceUnit};

/// Coarse classification of a value's shape, used to pick a serialization
/// directive. Deliberately distinct from the literal source-level type
/// spelling, which only matters here at classification time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Int,
    Wide,
    Float,
    Char,
    Text,
    Void,
}

/// A callable detected in a source unit that lacks an explicit entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallableSignature {
    pub name: String,
    pub return_kind: ValueKind,
    pub params: Vec<ValueKind>,
}

static C_ENTRY_RE: OnceLock<Regex> = OnceLock::new();
static C_CALLABLE_RE: OnceLock<Regex> = OnceLock::new();
static C_STDIN_RE: OnceLock<Regex> = OnceLock::new();
static PY_DEF_RE: OnceLock<Regex> = OnceLock::new();
static PY_MAIN_GUARD_RE: OnceLock<Regex> = OnceLock::new();
static PY_STDIN_RE: OnceLock<Regex> = OnceLock::new();

fn c_entry_re() -> &'static Regex {
    C_ENTRY_RE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*(?:int|void)\s+main\s*\(").expect("valid pattern")
    })
}

// Line-oriented declaration scan: optional modifiers in any order, a type
// phrase that may span several words, optional pointer stars, a name, and a
// parameter list up to the first closing parenthesis. Comments and string
// literals are not excluded, and parameter lists containing parentheses
// (function pointers) are cut short: both are known limitations of the
// heuristic and part of its contract.
fn c_callable_re() -> &'static Regex {
    C_CALLABLE_RE.get_or_init(|| {
        Regex::new(
            r"(?m)^[ \t]*(?:(?:static|extern|inline|register|const|volatile)\s+)*((?:unsigned|signed|long|short|int|float|double|char|void|size_t|bool)(?:\s+(?:unsigned|signed|long|short|int|float|double|char))*)(?:\s*(\*+)\s*|\s+)(\w+)\s*\(([^)]*)\)",
        )
        .expect("valid pattern")
    })
}

fn c_stdin_re() -> &'static Regex {
    C_STDIN_RE.get_or_init(|| {
        Regex::new(r"\b(?:scanf|getchar|fgets|gets)\s*\(|\bcin\s*>>").expect("valid pattern")
    })
}

fn py_def_re() -> &'static Regex {
    PY_DEF_RE.get_or_init(|| Regex::new(r"(?m)^def\s+(\w+)\s*\(([^)]*)\)").expect("valid pattern"))
}

fn py_main_guard_re() -> &'static Regex {
    PY_MAIN_GUARD_RE.get_or_init(|| Regex::new(r"(?m)^if\s+__name__\s*==").expect("valid pattern"))
}

fn py_stdin_re() -> &'static Regex {
    PY_STDIN_RE
        .get_or_init(|| Regex::new(r"\binput\s*\(|\bsys\s*\.\s*stdin").expect("valid pattern"))
}

// Compound type phrases, matched before any single-token lookup so that
// `long long` is never read as a plain `long`.
const COMPOUND_KINDS: &[(&str, ValueKind)] = &[
    ("unsigned long long int", ValueKind::Wide),
    ("unsigned long long", ValueKind::Wide),
    ("long long int", ValueKind::Wide),
    ("unsigned long int", ValueKind::Wide),
    ("long long", ValueKind::Wide),
    ("unsigned long", ValueKind::Wide),
    ("long double", ValueKind::Float),
    ("long int", ValueKind::Wide),
    ("unsigned int", ValueKind::Int),
    ("unsigned short", ValueKind::Int),
    ("unsigned char", ValueKind::Char),
    ("signed char", ValueKind::Char),
    ("signed int", ValueKind::Int),
];

fn single_kind(token: &str) -> Option<ValueKind> {
    match token {
        "int" | "short" | "unsigned" | "signed" | "size_t" | "bool" => Some(ValueKind::Int),
        "long" => Some(ValueKind::Wide),
        "float" | "double" => Some(ValueKind::Float),
        "char" => Some(ValueKind::Char),
        "void" => Some(ValueKind::Void),
        _ => None,
    }
}

/// Classifies a type phrase (possibly followed by a declarator name) into the
/// fixed kind vocabulary.
///
/// Whitespace runs are collapsed before matching, so `unsigned   int n`
/// classifies like `unsigned int`. Unrecognized phrases fall back to the
/// integer kind; callers treat that fallback as an approximation, not an
/// error.
pub fn classify_type_phrase(phrase: &str) -> ValueKind {
    let collapsed = phrase.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.starts_with("char") && collapsed.contains('*') {
        return ValueKind::Text;
    }
    for (form, kind) in COMPOUND_KINDS {
        if collapsed == *form || collapsed.starts_with(&format!("{form} ")) {
            return *kind;
        }
    }
    match collapsed.split(' ').next() {
        Some(token) => single_kind(token.trim_end_matches('*')).unwrap_or(ValueKind::Int),
        None => ValueKind::Int,
    }
}

/// Splits a comma-delimited list on top-level commas only, ignoring commas
/// nested inside brackets or quoted literals. Pieces come back trimmed.
pub fn split_top_level(list: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut prev = '\0';

    for ch in list.chars() {
        match quote {
            Some(q) => {
                if ch == q && prev != '\\' {
                    quote = None;
                }
                current.push(ch);
            }
            None => match ch {
                '\'' | '"' => {
                    quote = Some(ch);
                    current.push(ch);
                }
                '(' | '[' | '{' => {
                    depth += 1;
                    current.push(ch);
                }
                ')' | ']' | '}' => {
                    depth = depth.saturating_sub(1);
                    current.push(ch);
                }
                ',' if depth == 0 => {
                    parts.push(current.trim().to_string());
                    current.clear();
                }
                _ => current.push(ch),
            },
        }
        prev = ch;
    }

    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}

/// Whether the unit already defines the conventional program entry point and
/// should run unmodified.
pub fn has_entry_point(unit: &SourceUnit) -> bool {
    match unit.language {
        Language::Python => py_main_guard_re().is_match(&unit.text),
        Language::C | Language::Cpp => c_entry_re().is_match(&unit.text),
    }
}

/// Structural scan for the language family's read-from-stdin idiom.
///
/// The scan does not exclude comments, so a mention of `input()` in a comment
/// counts as a read. Known limitation.
pub fn reads_stdin(unit: &SourceUnit) -> bool {
    match unit.language {
        Language::Python => py_stdin_re().is_match(&unit.text),
        Language::C | Language::Cpp => c_stdin_re().is_match(&unit.text),
    }
}

/// Finds the first non-entry callable declared in the unit, if any.
pub fn parse_signature(unit: &SourceUnit) -> Option<CallableSignature> {
    match unit.language {
        Language::Python => parse_python_signature(&unit.text),
        Language::C | Language::Cpp => parse_c_signature(&unit.text),
    }
}

fn parse_c_signature(text: &str) -> Option<CallableSignature> {
    for caps in c_callable_re().captures_iter(text) {
        let name = caps[3].to_string();
        if name == "main" {
            continue;
        }

        let mut return_phrase = caps[1].to_string();
        if let Some(stars) = caps.get(2) {
            return_phrase.push(' ');
            return_phrase.push_str(stars.as_str());
        }

        let params = split_params(caps.get(4).map_or("", |m| m.as_str()));
        return Some(CallableSignature {
            name,
            return_kind: classify_type_phrase(&return_phrase),
            params,
        });
    }
    None
}

fn split_params(list: &str) -> Vec<ValueKind> {
    let pieces = split_top_level(list);
    // `f(void)` and `f()` both declare zero parameters
    if pieces.is_empty() || (pieces.len() == 1 && pieces[0] == "void") {
        return Vec::new();
    }
    pieces
        .iter()
        .map(|piece| classify_type_phrase(piece))
        .collect()
}

fn parse_python_signature(text: &str) -> Option<CallableSignature> {
    let caps = py_def_re().captures(text)?;
    let params = split_top_level(caps.get(2).map_or("", |m| m.as_str()))
        .into_iter()
        .filter(|p| !p.is_empty())
        // Python parameters are untyped; the integer kind stands in and is
        // never consulted for serialization.
        .map(|_| ValueKind::Int)
        .collect();
    Some(CallableSignature {
        name: caps[1].to_string(),
        return_kind: ValueKind::Int,
        params,
    })
}
