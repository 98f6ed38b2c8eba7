//! `partmaster show` command - a part as the KiCad library serves it

use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{escape_tsv, open_projection, print_structured};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::kicad::PartDetail;

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Internal part number, e.g. CAP-001-0001
    pub ipn: String,
}

pub fn run(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let projection = open_projection(global);
    let detail = projection.part_detail(&args.ipn).into_diagnostic()?;
    print_detail(&detail, global.format)
}

/// Print a part detail; shared with the commands that modify parts
pub fn print_detail(detail: &PartDetail, format: OutputFormat) -> Result<()> {
    if print_structured(detail, format)? {
        return Ok(());
    }

    match format {
        OutputFormat::Id => println!("{}", detail.id),
        OutputFormat::Tsv => {
            for (key, field) in detail.fields.iter() {
                println!("{}\t{}", key, escape_tsv(&field.value));
            }
        }
        _ => {
            println!("{}", style(&detail.id).cyan().bold());
            if !detail.name.is_empty() {
                println!("{}", detail.name);
            }
            println!(
                "{} {}   {} {}",
                style("Symbol:").dim(),
                detail.symbol_id_str,
                style("Revision:").dim(),
                if detail.revision.is_empty() { "-" } else { detail.revision.as_str() }
            );

            if !detail.fields.is_empty() {
                println!();
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                for (key, field) in detail.fields.iter() {
                    builder.push_record([key, field.value.as_str()]);
                }
                println!("{}", builder.build().with(Style::markdown()));
            }
        }
    }
    Ok(())
}
