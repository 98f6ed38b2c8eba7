//! Table formatting for CLI list commands
//!
//! Lists are printed as aligned columns with a bold header and a summary
//! line, as raw tab-separated values for piping, or as bare IDs.

use console::style;

use crate::cli::helpers::{escape_tsv, truncate_str};
use crate::cli::OutputFormat;

/// A column of a list table
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub header: &'static str,
    /// Upper bound on the rendered width
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(header: &'static str, width: usize) -> Self {
        Self { header, width }
    }
}

/// Renders rows whose first cell is the ID
pub struct TableFormatter {
    columns: &'static [ColumnDef],
    noun: &'static str,
    show_summary: bool,
}

impl TableFormatter {
    pub fn new(columns: &'static [ColumnDef], noun: &'static str) -> Self {
        Self {
            columns,
            noun,
            show_summary: true,
        }
    }

    pub fn without_summary(mut self) -> Self {
        self.show_summary = false;
        self
    }

    /// Render rows in the specified format
    pub fn render(&self, rows: &[Vec<String>], format: OutputFormat) -> String {
        match format {
            OutputFormat::Tsv => self.render_tsv(rows),
            OutputFormat::Id => rows
                .iter()
                .filter_map(|row| row.first())
                .map(|id| format!("{}\n", id))
                .collect(),
            _ => self.render_aligned(rows),
        }
    }

    pub fn output(&self, rows: &[Vec<String>], format: OutputFormat) {
        print!("{}", self.render(rows, format));
    }

    fn widths(&self, rows: &[Vec<String>]) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let content = rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|v| v.chars().count())
                    .max()
                    .unwrap_or(0);
                col.header.len().max(content).min(col.width)
            })
            .collect()
    }

    fn render_aligned(&self, rows: &[Vec<String>]) -> String {
        let widths = self.widths(rows);
        let mut out = String::new();

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| format!("{:<width$}", style(col.header).bold(), width = w))
            .collect();
        out.push_str(header.join(" ").trim_end());
        out.push('\n');

        let total: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);
        out.push_str(&"-".repeat(total));
        out.push('\n');

        for row in rows {
            let cells: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, &w)| {
                    let raw = row.get(i).map(String::as_str).unwrap_or("");
                    let text = if raw.is_empty() {
                        "-".to_string()
                    } else {
                        truncate_str(raw, w)
                    };
                    if i == 0 {
                        format!("{:<width$}", style(text).cyan(), width = w)
                    } else {
                        format!("{:<width$}", text, width = w)
                    }
                })
                .collect();
            out.push_str(cells.join(" ").trim_end());
            out.push('\n');
        }

        if self.show_summary {
            out.push('\n');
            out.push_str(&format!(
                "{} {}(s) found.\n",
                style(rows.len()).cyan(),
                self.noun
            ));
        }
        out
    }

    fn render_tsv(&self, rows: &[Vec<String>]) -> String {
        let mut out = String::new();
        let header: Vec<&str> = self.columns.iter().map(|c| c.header).collect();
        out.push_str(&header.join("\t"));
        out.push('\n');
        for row in rows {
            let cells: Vec<String> = row.iter().map(|c| escape_tsv(c)).collect();
            out.push_str(&cells.join("\t"));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: &[ColumnDef] = &[ColumnDef::new("ID", 14), ColumnDef::new("NAME", 10)];

    fn rows() -> Vec<Vec<String>> {
        vec![
            vec!["CAP-001-0001".into(), "100n X7R 16V 0402".into()],
            vec!["CAP-002-0001".into(), String::new()],
        ]
    }

    #[test]
    fn test_render_ids() {
        let out = TableFormatter::new(COLUMNS, "part").render(&rows(), OutputFormat::Id);
        assert_eq!(out, "CAP-001-0001\nCAP-002-0001\n");
    }

    #[test]
    fn test_render_tsv_keeps_full_values() {
        let out = TableFormatter::new(COLUMNS, "part").render(&rows(), OutputFormat::Tsv);
        assert_eq!(out, "ID\tNAME\nCAP-001-0001\t100n X7R 16V 0402\nCAP-002-0001\t\n");
    }

    #[test]
    fn test_render_aligned_truncates_and_summarizes() {
        console::set_colors_enabled(false);
        let out = TableFormatter::new(COLUMNS, "part").render(&rows(), OutputFormat::Auto);
        assert!(out.contains("100n X7..."));
        assert!(out.contains("CAP-002-0001 -"));
        assert!(out.ends_with("2 part(s) found.\n"));

        let out = TableFormatter::new(COLUMNS, "part")
            .without_summary()
            .render(&rows(), OutputFormat::Auto);
        assert!(!out.contains("found"));
    }
}
