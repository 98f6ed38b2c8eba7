//! CLI command implementations

pub mod categories;
pub mod check;
pub mod completions;
pub mod parts;
pub mod revise;
pub mod serve;
pub mod show;
pub mod sources;
pub mod update;
