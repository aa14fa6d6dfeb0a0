//! Unit header directives.
//!
//! Directives live in the leading comment block of a source file, before the
//! first line of code. Each is a line comment whose text starts with `@`:
//!
//! ```text
//! # @name: hello-alice
//! # @category: functions
//! # @expect: Hello, Alice!
//! # @fixture: sample.json
//! # @stdin: Alice
//! # @nondeterministic
//! ```
//!
//! Valued directives take the text after `: ` verbatim, so `# @expect:    x`
//! expects a line with three leading spaces. `@expect`, `@fixture` and
//! `@stdin` repeat; the rest may appear once. Comments after the first code
//! line are never read as directives.

/// Line-comment prefix for a source extension, or `None` when the extension
/// is not a recognized unit language.
#[must_use]
pub fn comment_prefix(language: &str) -> Option<&'static str> {
    match language {
        "py" | "sh" | "rb" => Some("#"),
        "js" | "mjs" | "ts" => Some("//"),
        _ => None,
    }
}

/// Header values found in one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    pub name: Option<String>,
    pub category: Option<String>,
    pub expect: Option<Vec<String>>,
    pub fixtures: Vec<String>,
    pub stdin: Option<Vec<String>>,
    pub nondeterministic: bool,
    pub deterministic: bool,
    /// Zero-based index of the first line after the header.
    pub body_start: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveError {
    /// One-based line number.
    pub line: usize,
    pub message: String,
}

impl DirectiveError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Parse the directive header of `source`.
pub fn parse(source: &str, comment_prefix: &str) -> Result<Directives, DirectiveError> {
    let mut directives = Directives::default();
    let mut expect_empty = false;

    let lines: Vec<&str> = source.lines().collect();
    let mut index = 0;
    if lines.first().is_some_and(|line| line.starts_with("#!")) {
        index = 1;
    }

    while index < lines.len() {
        let line = lines[index].trim_end_matches('\r');
        let trimmed = line.trim_start();
        let line_no = index + 1;

        if trimmed.is_empty() {
            index += 1;
            continue;
        }
        let Some(comment) = trimmed.strip_prefix(comment_prefix) else {
            break;
        };
        index += 1;

        let Some(body) = comment.trim_start().strip_prefix('@') else {
            continue;
        };
        let (key, value) = match body.split_once(':') {
            Some((key, value)) => (key.trim(), Some(value.strip_prefix(' ').unwrap_or(value))),
            None => (body.trim(), None),
        };

        match (key, value) {
            ("name", Some(value)) => {
                set_once(&mut directives.name, value.trim(), "name", line_no)?;
            }
            ("category", Some(value)) => {
                set_once(&mut directives.category, value.trim(), "category", line_no)?;
            }
            ("expect", Some(value)) => {
                if expect_empty {
                    return Err(DirectiveError::new(
                        line_no,
                        "@expect cannot be combined with @expect-empty",
                    ));
                }
                directives
                    .expect
                    .get_or_insert_with(Vec::new)
                    .push(value.to_string());
            }
            ("fixture", Some(value)) => {
                let value = value.trim();
                if value.is_empty() {
                    return Err(DirectiveError::new(line_no, "@fixture needs a path"));
                }
                directives.fixtures.push(value.to_string());
            }
            ("stdin", Some(value)) => {
                directives
                    .stdin
                    .get_or_insert_with(Vec::new)
                    .push(value.to_string());
            }
            ("expect-empty", None) => {
                if directives.expect.as_ref().is_some_and(|lines| !lines.is_empty()) {
                    return Err(DirectiveError::new(
                        line_no,
                        "@expect-empty cannot be combined with @expect",
                    ));
                }
                expect_empty = true;
                directives.expect = Some(Vec::new());
            }
            ("nondeterministic", None) => directives.nondeterministic = true,
            ("deterministic", None) => directives.deterministic = true,
            ("name" | "category" | "expect" | "fixture" | "stdin", None) => {
                return Err(DirectiveError::new(
                    line_no,
                    format!("@{key} needs a value (`@{key}: ...`)"),
                ));
            }
            ("expect-empty" | "nondeterministic" | "deterministic", Some(_)) => {
                return Err(DirectiveError::new(
                    line_no,
                    format!("@{key} does not take a value"),
                ));
            }
            (other, _) => {
                return Err(DirectiveError::new(
                    line_no,
                    format!("unknown directive '@{other}'"),
                ));
            }
        }
    }

    if directives.nondeterministic && directives.deterministic {
        return Err(DirectiveError::new(
            index,
            "@deterministic and @nondeterministic are mutually exclusive",
        ));
    }

    directives.body_start = index;
    Ok(directives)
}

fn set_once(
    slot: &mut Option<String>,
    value: &str,
    key: &str,
    line: usize,
) -> Result<(), DirectiveError> {
    if slot.is_some() {
        return Err(DirectiveError::new(line, format!("@{key} given twice")));
    }
    if value.is_empty() {
        return Err(DirectiveError::new(line, format!("@{key} needs a value")));
    }
    *slot = Some(value.to_string());
    Ok(())
}

/// True when `source` has at least one non-blank line after the header.
#[must_use]
pub fn has_body(source: &str, directives: &Directives) -> bool {
    source
        .lines()
        .skip(directives.body_start)
        .any(|line| !line.trim().is_empty())
}
