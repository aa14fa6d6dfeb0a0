use std::sync::Arc;

use globset::{Glob, GlobMatcher};
use primer_core::{Category, ExampleUnit};
use primer_registry::Registry;

/// Compile a `--filter` glob. `None` matches everything.
pub fn compile_filter(pattern: Option<&str>) -> anyhow::Result<Option<GlobMatcher>> {
    pattern
        .map(|pattern| {
            Glob::new(pattern)
                .map(|glob| glob.compile_matcher())
                .map_err(|error| anyhow::anyhow!("invalid --filter glob '{pattern}': {error}"))
        })
        .transpose()
}

/// Units matching `category` and `filter`, in registry order.
pub fn select_units(
    registry: &Registry,
    category: Option<Category>,
    filter: Option<&str>,
) -> anyhow::Result<Vec<Arc<ExampleUnit>>> {
    let matcher = compile_filter(filter)?;
    Ok(registry
        .list(category)
        .filter(|unit| {
            matcher
                .as_ref()
                .is_none_or(|matcher| matcher.is_match(unit.name()))
        })
        .cloned()
        .collect())
}
