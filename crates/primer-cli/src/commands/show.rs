use primer_core::{Determinism, ExampleUnit};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ShowArgs;
use crate::context::AppContext;
use crate::output::{Tabular, output};

#[derive(Serialize)]
#[serde(transparent)]
struct ShowResponse<'a> {
    unit: &'a ExampleUnit,
}

impl Tabular for ShowResponse<'_> {
    fn headers(&self) -> &'static [&'static str] {
        &["field", "value"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        let unit = self.unit;
        let determinism = match unit.determinism() {
            Determinism::Deterministic => "deterministic".to_string(),
            Determinism::Declared => "nondeterministic (declared)".to_string(),
            Determinism::Detected { marker } => format!("nondeterministic ({marker})"),
        };
        let expected = unit.expected_output().map_or_else(
            || "none".to_string(),
            |lines| format!("{} lines", lines.len()),
        );
        let fixtures = unit
            .requires_fixture()
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>();

        let mut rows = vec![
            vec!["name".to_string(), unit.name().to_string()],
            vec!["category".to_string(), unit.category().to_string()],
            vec!["language".to_string(), unit.language().to_string()],
            vec!["origin".to_string(), unit.origin().display().to_string()],
            vec!["determinism".to_string(), determinism],
            vec!["expected".to_string(), expected],
        ];
        if !fixtures.is_empty() {
            rows.push(vec!["fixtures".to_string(), fixtures.join(", ")]);
        }
        if let Some(stdin) = unit.stdin() {
            rows.push(vec!["stdin".to_string(), format!("{stdin:?}")]);
        }
        rows
    }

    fn footer(&self) -> Option<String> {
        Some(self.unit.source().trim_end().to_string())
    }
}

/// Handle `primer show`.
pub fn handle(args: &ShowArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let unit = ctx.registry.get(&args.name)?;
    output(&ShowResponse { unit }, flags.format)
}
