//! Plain-text rendering of a [`TableData`] for terminals and logs.

use crate::{
    core::utils::{escape_control_chars, truncate_chars},
    records::table::TableData,
};
use serde::{Deserialize, Serialize};

/// How much of a table is shown when it is printed. Purely advisory: the
/// table itself is never truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    /// Rows shown before eliding the middle. `0` shows every row.
    pub max_rows: usize,
    /// Columns shown before eliding the middle. `0` shows every column.
    pub max_columns: usize,
    /// Line width; wider tables are wrapped into column blocks.
    pub width: usize,
    /// Longest cell text before it is cut with `...`.
    pub max_colwidth: usize,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        DisplayOptions {
            max_rows: 60,
            max_columns: 20,
            width: 80,
            max_colwidth: 50,
        }
    }
}

impl DisplayOptions {
    /// Preferences used while debugging: more columns, very wide lines.
    pub fn debug() -> Self {
        DisplayOptions {
            max_rows: 50,
            max_columns: 50,
            width: 1000,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    At(usize),
    Elided,
}

fn visible_slots(len: usize, max: usize) -> Vec<Slot> {
    if max == 0 || len <= max {
        return (0..len).map(Slot::At).collect();
    }
    let head = max / 2 + max % 2;
    let tail = max / 2;
    let mut slots: Vec<Slot> = (0..head).map(Slot::At).collect();
    slots.push(Slot::Elided);
    slots.extend((len - tail..len).map(Slot::At));
    slots
}

const ELLIPSIS: &str = "...";

pub(crate) fn render_table(table: &TableData, options: &DisplayOptions) -> String {
    if table.is_empty() {
        return format!("Empty table\nColumns: [{}]", table.columns().join(", "));
    }

    let row_slots = visible_slots(table.num_rows(), options.max_rows);
    let col_slots = visible_slots(table.num_columns(), options.max_columns);
    let max_colwidth = options.max_colwidth.max(ELLIPSIS.len());

    let cell = |text: String| truncate_chars(&escape_control_chars(&text), max_colwidth);

    // grid[0] is the header line, column 0 is the row index
    let mut grid: Vec<Vec<String>> = Vec::with_capacity(row_slots.len() + 1);

    let mut header = vec![String::new()];
    header.extend(col_slots.iter().map(|slot| match slot {
        Slot::At(c) => cell(table.columns()[*c].clone()),
        Slot::Elided => ELLIPSIS.to_string(),
    }));
    grid.push(header);

    for row_slot in &row_slots {
        let line = match row_slot {
            Slot::At(r) => {
                let values = &table.rows()[*r];
                let mut line = vec![r.to_string()];
                line.extend(col_slots.iter().map(|slot| match slot {
                    Slot::At(c) => cell(values[*c].to_string()),
                    Slot::Elided => ELLIPSIS.to_string(),
                }));
                line
            }
            Slot::Elided => vec![ELLIPSIS.to_string(); col_slots.len() + 1],
        };
        grid.push(line);
    }

    let widths: Vec<usize> = (0..=col_slots.len())
        .map(|c| {
            grid.iter()
                .map(|line| line[c].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let blocks = column_blocks(&widths, options.width);
    let mut rendered: Vec<String> = Vec::with_capacity(blocks.len());
    for block in blocks {
        let lines: Vec<String> = grid
            .iter()
            .map(|line| {
                let mut out = format!("{:<width$}", line[0], width = widths[0]);
                for &c in &block {
                    out.push_str("  ");
                    out.push_str(&format!("{:>width$}", line[c], width = widths[c]));
                }
                out.trim_end().to_string()
            })
            .collect();
        rendered.push(lines.join("\n"));
    }

    let mut out = rendered.join("\n\n");
    let truncated = row_slots.len() < table.num_rows() || col_slots.len() < table.num_columns();
    if truncated {
        out.push_str(&format!(
            "\n\n[{} rows x {} columns]",
            table.num_rows(),
            table.num_columns()
        ));
    }
    out
}

/// Greedily packs grid columns `1..widths.len()` into blocks that fit in
/// `width`, each block at least one column wide.
fn column_blocks(widths: &[usize], width: usize) -> Vec<Vec<usize>> {
    let mut blocks = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut line_len = widths[0];

    for (c, w) in widths.iter().enumerate().skip(1) {
        let needed = 2 + w;
        if !current.is_empty() && line_len + needed > width {
            blocks.push(std::mem::take(&mut current));
            line_len = widths[0];
        }
        current.push(c);
        line_len += needed;
    }
    if !current.is_empty() || blocks.is_empty() {
        blocks.push(current);
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::Value;

    fn numbers(rows: usize, cols: usize) -> TableData {
        let columns = (0..cols).map(|c| format!("c{c}")).collect();
        let data = (0..rows)
            .map(|r| (0..cols).map(|c| Value::Int((r * cols + c) as i64)).collect())
            .collect();
        TableData::new(columns, data).unwrap()
    }

    #[test]
    fn small_table_is_rendered_in_full() {
        let table = TableData::new(
            vec!["id".into(), "name".into()],
            vec![
                vec![Value::Int(1), Value::String("ann".into())],
                vec![Value::Int(22), Value::Null],
            ],
        )
        .unwrap();

        let expected = "   id  name\n0   1   ann\n1  22  NULL";
        assert_eq!(table.render(&DisplayOptions::default()), expected);
    }

    #[test]
    fn long_tables_elide_middle_rows() {
        let table = numbers(100, 1);
        let options = DisplayOptions {
            max_rows: 4,
            ..DisplayOptions::default()
        };
        let out = table.render(&options);
        let lines: Vec<&str> = out.lines().collect();
        let cells = |line: &str| line.split_whitespace().map(str::to_string).collect::<Vec<_>>();
        assert_eq!(cells(lines[1]), vec!["0", "0"]);
        assert_eq!(cells(lines[3]), vec!["...", "..."]);
        assert_eq!(cells(lines[5]), vec!["99", "99"]);
        assert!(out.ends_with("[100 rows x 1 columns]"));
    }

    #[test]
    fn wide_tables_elide_middle_columns() {
        let table = numbers(1, 10);
        let options = DisplayOptions {
            max_columns: 2,
            ..DisplayOptions::default()
        };
        let out = table.render(&options);
        let header = out.lines().next().unwrap();
        assert!(header.contains("c0"));
        assert!(header.contains("..."));
        assert!(header.contains("c9"));
        assert!(!header.contains("c5"));
    }

    #[test]
    fn narrow_width_wraps_into_blocks() {
        let table = numbers(2, 6);
        let options = DisplayOptions {
            width: 12,
            ..DisplayOptions::default()
        };
        let out = table.render(&options);
        assert!(out.split("\n\n").count() > 1);
        for line in out.lines() {
            assert!(line.chars().count() <= 12, "line too wide: {line:?}");
        }
    }

    #[test]
    fn debug_preferences() {
        let options = DisplayOptions::debug();
        assert_eq!(
            (options.max_rows, options.max_columns, options.width),
            (50, 50, 1000)
        );
    }

    #[test]
    fn empty_table_lists_columns() {
        let table = TableData::empty(vec!["a".into(), "b".into()]);
        assert_eq!(
            table.render(&DisplayOptions::default()),
            "Empty table\nColumns: [a, b]"
        );
    }
}
