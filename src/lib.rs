//! Partmaster: a directory of part CSV files served as a KiCad HTTP library
//!
//! Each CSV file in the partmaster directory holds rows keyed by an internal
//! part number (`CCC-NNN-VVVV`). The catalog merges rows that share a part
//! number, and the KiCad projection exposes them as categories, parts and
//! revisions.

pub mod cli;
pub mod core;
pub mod kicad;
