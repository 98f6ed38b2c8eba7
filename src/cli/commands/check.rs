//! `partmaster check` command - find unreadable files and malformed part numbers
//!
//! Stores are read one by one rather than through the catalog, so a broken
//! file is reported instead of replacing the whole directory with a blank
//! store.

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{escape_tsv, partmaster_dir, print_structured};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::store::{list_csv_files, IPN_COLUMN};
use crate::core::{CsvStore, Ipn};

#[derive(clap::Args, Debug)]
pub struct CheckArgs {}

/// A row whose IPN does not parse, or a store that cannot be read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub store: String,
    /// 1-based data row, header excluded; 0 for the whole store
    pub row: usize,
    pub ipn: String,
    pub problem: String,
}

/// Load each file, turning read and parse errors into findings
pub fn load_stores(files: &[PathBuf]) -> (Vec<CsvStore>, Vec<Finding>) {
    let mut stores = Vec::new();
    let mut findings = Vec::new();

    for path in files {
        match CsvStore::load(path) {
            Ok(store) => stores.push(store),
            Err(e) => findings.push(Finding {
                store: path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                row: 0,
                ipn: String::new(),
                problem: e.to_string(),
            }),
        }
    }

    (stores, findings)
}

/// Check every row of the given stores
pub fn check_stores(stores: &[CsvStore]) -> Vec<Finding> {
    let mut findings = Vec::new();

    for store in stores {
        if store.find_column(IPN_COLUMN).is_none() {
            if !store.rows.is_empty() {
                findings.push(Finding {
                    store: store.name().to_string(),
                    row: 0,
                    ipn: String::new(),
                    problem: format!("no {} column", IPN_COLUMN),
                });
            }
            continue;
        }

        for i in 0..store.rows.len() {
            let ipn = store.ipn_at(i).unwrap_or("");
            if let Err(e) = Ipn::parse(ipn) {
                findings.push(Finding {
                    store: store.name().to_string(),
                    row: i + 1,
                    ipn: ipn.to_string(),
                    problem: e.to_string(),
                });
            }
        }
    }

    findings
}

pub fn run(_args: CheckArgs, global: &GlobalOpts) -> Result<()> {
    let dir = partmaster_dir(global);
    let files = list_csv_files(&dir).into_diagnostic()?;
    let (stores, mut findings) = load_stores(&files);
    findings.extend(check_stores(&stores));

    if !print_structured(&findings, global.format)? {
        match global.format {
            OutputFormat::Id => {
                for f in findings.iter().filter(|f| !f.ipn.is_empty()) {
                    println!("{}", f.ipn);
                }
            }
            OutputFormat::Tsv => {
                for f in &findings {
                    println!(
                        "{}\t{}\t{}\t{}",
                        f.store,
                        f.row,
                        escape_tsv(&f.ipn),
                        escape_tsv(&f.problem)
                    );
                }
            }
            _ => {
                if !findings.is_empty() {
                    let mut builder = Builder::default();
                    builder.push_record(["Store", "Row", "IPN", "Problem"]);
                    for f in &findings {
                        builder.push_record([
                            f.store.clone(),
                            f.row.to_string(),
                            f.ipn.clone(),
                            f.problem.clone(),
                        ]);
                    }
                    println!("{}", builder.build().with(Style::markdown()));
                    println!();
                }
                if !global.quiet {
                    let rows: usize = stores.iter().map(|s| s.rows.len()).sum();
                    if findings.is_empty() {
                        println!(
                            "{} {} row(s) in {} store(s), all part numbers valid",
                            style("✓").green(),
                            rows,
                            stores.len()
                        );
                    } else {
                        println!(
                            "{} {} problem(s) in {} file(s)",
                            style("✗").red(),
                            style(findings.len()).red(),
                            files.len()
                        );
                    }
                }
            }
        }
    }

    if findings.is_empty() {
        Ok(())
    } else {
        Err(miette::miette!("{} problem(s) found", findings.len()))
    }
}
