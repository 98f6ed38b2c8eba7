//! `partmaster parts` command - list the parts of a category

use miette::Result;

use crate::cli::helpers::{open_projection, print_structured};
use crate::cli::table::{ColumnDef, TableFormatter};
use crate::cli::GlobalOpts;

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("IPN", 14),
    ColumnDef::new("NAME", 40),
    ColumnDef::new("DESCRIPTION", 40),
];

#[derive(clap::Args, Debug)]
pub struct PartsArgs {
    /// Category code, e.g. CAP or RES
    pub category: String,
}

pub fn run(args: PartsArgs, global: &GlobalOpts) -> Result<()> {
    let projection = open_projection(global);
    let parts = projection.list_parts(&args.category);

    if print_structured(&parts, global.format)? {
        return Ok(());
    }

    let rows: Vec<Vec<String>> = parts
        .into_iter()
        .map(|p| vec![p.id, p.name, p.description])
        .collect();

    let mut table = TableFormatter::new(COLUMNS, "part");
    if global.quiet {
        table = table.without_summary();
    }
    table.output(&rows, global.format);
    Ok(())
}
