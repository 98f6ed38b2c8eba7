//! `partmaster update` command - edit a part's description and sources

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::show::print_detail;
use crate::cli::helpers::{open_projection, parse_source};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::kicad::{PartUpdate, SourceUpdate};

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Internal part number, e.g. CAP-001-0001
    pub ipn: String,

    /// New description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Manufacturer source as MANUFACTURER:MPN (repeat for second, third, ... source)
    #[arg(long = "source", short = 's', value_parser = parse_source)]
    pub sources: Vec<SourceUpdate>,
}

pub fn run(args: UpdateArgs, global: &GlobalOpts) -> Result<()> {
    let update = PartUpdate {
        description: args.description.unwrap_or_default(),
        sources: args.sources,
    };
    if update.description.is_empty() && update.sources.is_empty() {
        return Err(miette::miette!(
            "Nothing to update. Pass --description and/or --source MANUFACTURER:MPN"
        ));
    }

    let mut projection = open_projection(global);
    let detail = projection.update_part(&args.ipn, &update).into_diagnostic()?;

    if global.format == OutputFormat::Auto {
        if !global.quiet {
            println!("{} Updated {}", style("✓").green(), style(&detail.id).cyan());
        }
        return Ok(());
    }
    print_detail(&detail, global.format)
}
