//! `partmaster revise` command - start a new revision of a part

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::show::print_detail;
use crate::cli::helpers::open_projection;
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(clap::Args, Debug)]
pub struct ReviseArgs {
    /// Internal part number of the current revision, e.g. CAP-001-0001
    pub ipn: String,
}

pub fn run(args: ReviseArgs, global: &GlobalOpts) -> Result<()> {
    let mut projection = open_projection(global);
    let detail = projection.start_new_revision(&args.ipn).into_diagnostic()?;

    match global.format {
        OutputFormat::Auto => {
            if global.quiet {
                println!("{}", detail.id);
            } else {
                println!(
                    "{} Created {} from {}",
                    style("✓").green(),
                    style(&detail.id).cyan(),
                    style(&args.ipn).dim()
                );
            }
            Ok(())
        }
        format => print_detail(&detail, format),
    }
}
