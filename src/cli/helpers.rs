//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::kicad::{CatalogProjection, SourceUpdate};

/// Layered configuration with the `--dir` flag applied on top
pub fn load_config(global: &GlobalOpts) -> Config {
    let mut config = Config::load();
    if let Some(dir) = &global.dir {
        config.partmaster_dir = Some(dir.clone());
    }
    config
}

/// Directory the commands operate on
pub fn partmaster_dir(global: &GlobalOpts) -> PathBuf {
    load_config(global).partmaster_dir()
}

/// Load the catalog for the selected directory
pub fn open_projection(global: &GlobalOpts) -> CatalogProjection {
    let dir = partmaster_dir(global);
    debug!(dir = %dir.display(), "opening partmaster");
    CatalogProjection::open(&dir)
}

/// Print a value as JSON or YAML; returns false for other formats
pub fn print_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value).into_diagnostic()?;
            println!("{}", json);
            Ok(true)
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(value).into_diagnostic()?;
            print!("{}", yaml);
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Parse a `MANUFACTURER:MPN` pair
///
/// Only the first colon separates the two, so MPNs may contain colons.
pub fn parse_source(s: &str) -> std::result::Result<SourceUpdate, String> {
    match s.split_once(':') {
        Some((manufacturer, mpn)) => Ok(SourceUpdate {
            manufacturer: manufacturer.trim().to_string(),
            mpn: mpn.trim().to_string(),
        }),
        None => Err(format!("expected MANUFACTURER:MPN, got '{}'", s)),
    }
}

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Make a cell safe for tab-separated output
pub fn escape_tsv(s: &str) -> String {
    s.replace(['\t', '\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("this is a long string", 10), "this is...");
        assert_eq!(truncate_str("µF µF µF µF", 8), "µF µF...");
    }

    #[test]
    fn test_parse_source() {
        let source = parse_source("Murata:GRM155R71C104KA88D").unwrap();
        assert_eq!(source.manufacturer, "Murata");
        assert_eq!(source.mpn, "GRM155R71C104KA88D");

        let source = parse_source("Acme:X:1").unwrap();
        assert_eq!(source.mpn, "X:1");

        let source = parse_source(":").unwrap();
        assert!(source.manufacturer.is_empty() && source.mpn.is_empty());

        assert!(parse_source("no-colon").is_err());
    }

    #[test]
    fn test_escape_tsv() {
        assert_eq!(escape_tsv("a\tb\nc"), "a b c");
    }
}
