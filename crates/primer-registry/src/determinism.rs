//! Detection of wall-clock and randomness markers in unit sources.
//!
//! A unit that prints expected output but reads the clock or a random source
//! cannot be compared line by line. The scan is textual and conservative; a
//! unit that only uses `time.sleep` can opt out with `@deterministic`.

use std::sync::LazyLock;

use regex::Regex;

static PYTHON_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:import|from)\s+(?:random|time|datetime|uuid|secrets)\b[^\n]*")
        .expect("python marker regex is valid")
});

static JS_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Math\.random\s*\(|Date\.now\s*\(|new\s+Date\s*\(|crypto\.randomUUID")
        .expect("js marker regex is valid")
});

static SHELL_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$RANDOM|\$\(\s*date\b|`\s*date\b|/dev/u?random")
        .expect("shell marker regex is valid")
});

/// Return the first non-determinism marker found in `source`, if any.
#[must_use]
pub fn detect_marker(language: &str, source: &str) -> Option<String> {
    let regex = match language {
        "py" => &*PYTHON_MARKERS,
        "js" | "mjs" | "ts" => &*JS_MARKERS,
        "sh" => &*SHELL_MARKERS,
        _ => return None,
    };
    regex
        .find(source)
        .map(|found| found.as_str().trim().to_string())
}
