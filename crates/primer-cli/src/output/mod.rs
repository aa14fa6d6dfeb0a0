use serde::Serialize;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// A response that knows how to lay itself out as a table.
///
/// JSON and raw output always go through `Serialize`.
pub trait Tabular {
    fn headers(&self) -> &'static [&'static str];
    fn rows(&self) -> Vec<Vec<String>>;

    /// Text printed under the table, such as totals.
    fn footer(&self) -> Option<String> {
        None
    }
}

/// Render a response to a string in the requested format.
pub fn render<T: Serialize + Tabular>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
        OutputFormat::Table => Ok(render_table(value)),
    }
}

/// Print a response in the requested format.
pub fn output<T: Serialize + Tabular>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn render_table<T: Tabular>(value: &T) -> String {
    let prefs = ui::prefs();
    let options = table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    };

    let rows = value.rows();
    let mut rendered = if rows.is_empty() {
        String::from("(no units)")
    } else {
        table::render_table(value.headers(), &rows, options)
    };
    if let Some(footer) = value.footer() {
        rendered.push_str("\n\n");
        rendered.push_str(&footer);
    }
    rendered
}
