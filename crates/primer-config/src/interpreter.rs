//! Interpreter table: source extension to the program that runs it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InterpreterConfig {
    /// Program name or path, resolved through the child's `PATH`.
    pub program: String,

    /// Arguments placed before the script path.
    #[serde(default)]
    pub args: Vec<String>,

    /// Extra environment for this interpreter only.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl InterpreterConfig {
    #[must_use]
    pub fn program(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            env: BTreeMap::new(),
        }
    }
}

/// Built-in interpreters for `py`, `js` and `sh`.
#[must_use]
pub fn default_interpreters() -> BTreeMap<String, InterpreterConfig> {
    let mut python = InterpreterConfig::program("python3");
    python.env.extend(
        [
            ("PYTHONHASHSEED", "0"),
            ("PYTHONIOENCODING", "utf-8"),
            ("PYTHONDONTWRITEBYTECODE", "1"),
        ]
        .map(|(key, value)| (key.to_string(), value.to_string())),
    );

    BTreeMap::from([
        ("py".to_string(), python),
        ("js".to_string(), InterpreterConfig::program("node")),
        ("sh".to_string(), InterpreterConfig::program("sh")),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn python_runs_with_fixed_hash_seed() {
        let table = default_interpreters();
        let python = table.get("py").expect("py interpreter");
        assert_eq!(python.program, "python3");
        assert_eq!(python.env.get("PYTHONHASHSEED").map(String::as_str), Some("0"));
    }

    #[test]
    fn shell_and_node_are_present() {
        let table = default_interpreters();
        assert_eq!(table.get("sh").map(|i| i.program.as_str()), Some("sh"));
        assert_eq!(table.get("js").map(|i| i.program.as_str()), Some("node"));
    }
}
