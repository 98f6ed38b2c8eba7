//! `partmaster sources` command - every source of a part in priority order

use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{escape_tsv, open_projection, print_structured};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Ipn;

#[derive(clap::Args, Debug)]
pub struct SourcesArgs {
    /// Internal part number, e.g. CAP-001-0001
    pub ipn: String,
}

pub fn run(args: SourcesArgs, global: &GlobalOpts) -> Result<()> {
    let ipn = Ipn::parse(&args.ipn).into_diagnostic()?;
    let projection = open_projection(global);
    let sources = projection.catalog().resolve_all(&ipn).into_diagnostic()?;

    if print_structured(&sources, global.format)? {
        return Ok(());
    }

    let priority = |p: Option<i64>| p.map(|n| n.to_string()).unwrap_or_default();

    match global.format {
        OutputFormat::Id => println!("{}", ipn),
        OutputFormat::Tsv => {
            println!("PRIORITY\tMANUFACTURER\tMPN\tSTORE\tDESCRIPTION\tVALUE\tFOOTPRINT");
            for s in &sources {
                let cells = [
                    priority(s.priority),
                    escape_tsv(&s.manufacturer),
                    escape_tsv(&s.mpn),
                    escape_tsv(&s.store),
                    escape_tsv(&s.description),
                    escape_tsv(&s.value),
                    escape_tsv(&s.footprint),
                ];
                println!("{}", cells.join("\t"));
            }
        }
        _ => {
            let Some(best) = sources.first() else {
                return Ok(());
            };
            println!("{}", style(ipn.as_str()).cyan().bold());
            if !best.description.is_empty() {
                println!("{}", best.description);
            }
            println!(
                "{} {}   {} {}",
                style("Value:").dim(),
                if best.value.is_empty() { "-" } else { best.value.as_str() },
                style("Footprint:").dim(),
                if best.footprint.is_empty() { "-" } else { best.footprint.as_str() }
            );
            println!();

            let mut builder = Builder::default();
            builder.push_record(["#", "Priority", "Manufacturer", "MPN", "Store"]);
            for (i, s) in sources.iter().enumerate() {
                builder.push_record([
                    (i + 1).to_string(),
                    priority(s.priority),
                    s.manufacturer.clone(),
                    s.mpn.clone(),
                    s.store.clone(),
                ]);
            }
            println!("{}", builder.build().with(Style::markdown()));

            if !global.quiet {
                println!();
                println!("{} source(s) found.", style(sources.len()).cyan());
            }
        }
    }
    Ok(())
}
