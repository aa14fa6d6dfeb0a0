use primer_core::{Category, ExampleUnit};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ListArgs;
use crate::commands::shared::select::select_units;
use crate::context::AppContext;
use crate::output::{Tabular, output};

#[derive(Debug, Serialize)]
struct ListEntry {
    name: String,
    category: Category,
    language: String,
    compared: bool,
    fixtures: Vec<String>,
}

impl From<&ExampleUnit> for ListEntry {
    fn from(unit: &ExampleUnit) -> Self {
        Self {
            name: unit.name().to_string(),
            category: unit.category(),
            language: unit.language().to_string(),
            compared: unit.is_comparable(),
            fixtures: unit
                .requires_fixture()
                .iter()
                .map(|path| path.display().to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ListResponse {
    units: Vec<ListEntry>,
}

impl Tabular for ListResponse {
    fn headers(&self) -> &'static [&'static str] {
        &["name", "category", "lang", "compared", "fixtures"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.units
            .iter()
            .map(|entry| {
                vec![
                    entry.name.clone(),
                    entry.category.to_string(),
                    entry.language.clone(),
                    if entry.compared { "yes" } else { "no" }.to_string(),
                    if entry.fixtures.is_empty() {
                        "-".to_string()
                    } else {
                        entry.fixtures.join(", ")
                    },
                ]
            })
            .collect()
    }

    fn footer(&self) -> Option<String> {
        Some(format!("{} units", self.units.len()))
    }
}

/// Handle `primer list`.
pub fn handle(args: &ListArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let units = select_units(&ctx.registry, args.category, args.filter.as_deref())?;
    let response = ListResponse {
        units: units.iter().map(|unit| ListEntry::from(unit.as_ref())).collect(),
    };
    output(&response, flags.format)
}
