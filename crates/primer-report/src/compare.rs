//! Line-by-line comparison of captured stdout against expected output.

use std::fmt;

use serde::Serialize;

/// First point where actual output departs from the expected lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Divergence {
    /// Zero-based line index.
    pub index: usize,
    /// Expected line at `index`, `None` when the output ran long.
    pub expected: Option<String>,
    /// Actual line at `index`, `None` when the output ran short.
    pub actual: Option<String>,
    pub expected_lines: usize,
    pub actual_lines: usize,
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |line: &Option<String>| {
            line.as_ref()
                .map_or_else(|| "<end of output>".to_string(), |line| format!("{line:?}"))
        };
        write!(
            f,
            "line {}: expected {}, got {}",
            self.index + 1,
            show(&self.expected),
            show(&self.actual)
        )?;
        if self.expected_lines != self.actual_lines {
            write!(
                f,
                " ({} lines expected, {} printed)",
                self.expected_lines, self.actual_lines
            )?;
        }
        Ok(())
    }
}

/// Split captured output into lines.
///
/// A trailing `\r` is dropped from every line and the final newline does not
/// start an extra empty line, so `"a\r\nb\n"` is `["a", "b"]`.
#[must_use]
pub fn output_lines(stdout: &str) -> Vec<&str> {
    if stdout.is_empty() {
        return Vec::new();
    }
    let body = stdout.strip_suffix('\n').unwrap_or(stdout);
    body.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Compare `stdout` with `expected`, exactly and in order.
///
/// Returns `None` on a match.
#[must_use]
pub fn compare(expected: &[String], stdout: &str) -> Option<Divergence> {
    let actual = output_lines(stdout);
    let index = expected
        .iter()
        .zip(&actual)
        .position(|(want, got)| want != got)
        .or_else(|| (expected.len() != actual.len()).then(|| expected.len().min(actual.len())))?;

    Some(Divergence {
        index,
        expected: expected.get(index).cloned(),
        actual: actual.get(index).map(|line| (*line).to_string()),
        expected_lines: expected.len(),
        actual_lines: actual.len(),
    })
}
