//! `partmaster categories` command - list part categories

use miette::Result;

use crate::cli::helpers::{open_projection, print_structured};
use crate::cli::table::{ColumnDef, TableFormatter};
use crate::cli::GlobalOpts;

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("ID", 6),
    ColumnDef::new("NAME", 28),
    ColumnDef::new("DESCRIPTION", 50),
];

#[derive(clap::Args, Debug)]
pub struct CategoriesArgs {}

pub fn run(_args: CategoriesArgs, global: &GlobalOpts) -> Result<()> {
    let projection = open_projection(global);
    let categories = projection.list_categories();

    if print_structured(&categories, global.format)? {
        return Ok(());
    }

    let rows: Vec<Vec<String>> = categories
        .into_iter()
        .map(|c| vec![c.id, c.name, c.description])
        .collect();

    let mut table = TableFormatter::new(COLUMNS, "category");
    if global.quiet {
        table = table.without_summary();
    }
    table.output(&rows, global.format);
    Ok(())
}
