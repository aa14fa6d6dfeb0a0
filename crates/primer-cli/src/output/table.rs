/// Narrowest a column is squeezed to when fitting the terminal.
const MIN_COLUMN: usize = 6;
const GAP: &str = "  ";

#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

/// Render aligned rows under a header and a dashed divider.
///
/// Numeric cells are right-aligned; verdict words are colored when
/// `options.color` is set. Widths count characters, not bytes.
#[must_use]
pub fn render_table(headers: &[&str], rows: &[Vec<String>], options: TableOptions) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(column, header)| {
            rows.iter()
                .filter_map(|row| row.get(column))
                .map(|cell| width_of(cell))
                .chain(std::iter::once(width_of(header)))
                .max()
                .unwrap_or(0)
        })
        .collect();
    shrink_to_fit(&mut widths, options.max_width);

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, &width)| pad(&clip(header, width), width, false))
        .collect::<Vec<_>>()
        .join(GAP);
    let header_line = header_line.trim_end().to_string();

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(header_line.clone());
    lines.push("-".repeat(width_of(&header_line)));
    for row in rows {
        let line = widths
            .iter()
            .enumerate()
            .map(|(column, &width)| {
                let cell = clip(row.get(column).map_or("-", String::as_str), width);
                let padded = pad(&cell, width, looks_numeric(&cell));
                if options.color {
                    paint(&cell, padded)
                } else {
                    padded
                }
            })
            .collect::<Vec<_>>()
            .join(GAP);
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}

fn width_of(text: &str) -> usize {
    text.chars().count()
}

/// Narrow the widest columns one character at a time until the table fits.
fn shrink_to_fit(widths: &mut [usize], max_width: Option<usize>) {
    let Some(max_width) = max_width else {
        return;
    };
    let gaps = widths.len().saturating_sub(1) * GAP.len();
    while widths.iter().sum::<usize>() + gaps > max_width {
        let widest = widths
            .iter_mut()
            .filter(|width| **width > MIN_COLUMN)
            .max_by_key(|width| **width);
        match widest {
            Some(width) => *width -= 1,
            None => break,
        }
    }
}

fn clip(text: &str, width: usize) -> String {
    if width_of(text) <= width {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(width.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

fn pad(text: &str, width: usize, right_align: bool) -> String {
    if right_align {
        format!("{text:>width$}")
    } else {
        format!("{text:<width$}")
    }
}

fn looks_numeric(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && trimmed.chars().all(|ch| ch.is_ascii_digit() || ch == '.')
}

/// Wrap an already padded cell in an ANSI color picked from its content.
fn paint(cell: &str, padded: String) -> String {
    let code = match cell.trim() {
        "passed" | "yes" => "32",
        "skipped" => "33",
        "failed" | "errored" | "timed_out" => "31",
        _ => return padded,
    };
    format!("\u{1b}[{code}m{padded}\u{1b}[0m")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{TableOptions, render_table};

    const PLAIN: TableOptions = TableOptions {
        max_width: None,
        color: false,
    };

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| (*cell).to_string()).collect()
    }

    #[test]
    fn aligns_columns() {
        let table = render_table(
            &["name", "ms"],
            &[row(&["hello", "5"]), row(&["a-much-longer-name", "1200"])],
            PLAIN,
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "name                ms");
        assert!(lines[1].chars().all(|ch| ch == '-'));
        assert_eq!(lines[2], "hello                  5");
        assert_eq!(lines[3], "a-much-longer-name  1200");
    }

    #[test]
    fn long_cells_are_clipped_to_fit() {
        let table = render_table(
            &["name", "detail"],
            &[row(&["x", "a very long explanation of what went wrong"])],
            TableOptions {
                max_width: Some(30),
                color: false,
            },
        );
        for line in table.lines() {
            assert!(line.chars().count() <= 30, "{line}");
        }
        assert!(table.contains('…'));
    }

    #[test]
    fn verdicts_are_colored_on_request() {
        let table = render_table(
            &["verdict"],
            &[row(&["passed"]), row(&["failed"])],
            TableOptions {
                max_width: None,
                color: true,
            },
        );
        assert!(table.contains("\u{1b}[32mpassed "));
        assert!(table.contains("\u{1b}[31mfailed "));
    }

    #[test]
    fn missing_cells_render_as_dash() {
        let table = render_table(&["a", "b"], &[row(&["only"])], PLAIN);
        assert_eq!(table.lines().nth(2), Some("only  -"));
    }
}
