//! The partmaster catalog: every CSV store in a directory, queried by IPN
//!
//! A part number may appear in several rows, possibly spread over several
//! files. Each such row is a *source* for the part (a different manufacturer
//! or distributor option). Sources are ranked by their `Priority` column,
//! lowest number first, and share their descriptive fields.

use serde::Serialize;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::ipn::{Ipn, IpnError};
use crate::core::store::{CsvStore, StoreError, IPN_COLUMN};

/// Errors raised by catalog queries and mutations
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Ipn(#[from] IpnError),

    #[error("invalid IPN format: '{0}'")]
    InvalidFormat(String),

    #[error("part not found: {0}")]
    NotFound(String),

    #[error("revision of {0} cannot be incremented past 9999")]
    RevisionOverflow(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// How a caller should report an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input: malformed identifier or request
    Rejected,
    /// The requested part does not exist
    Missing,
    /// I/O or parse failure on our side
    Failed,
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Ipn(_)
            | CatalogError::InvalidFormat(_)
            | CatalogError::RevisionOverflow(_) => ErrorKind::Rejected,
            CatalogError::NotFound(_) => ErrorKind::Missing,
            CatalogError::Store(_) => ErrorKind::Failed,
        }
    }
}

/// One row of the partmaster, viewed through the well-known columns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartSource {
    #[serde(rename = "IPN")]
    pub ipn: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Footprint")]
    pub footprint: String,
    #[serde(rename = "Value")]
    pub value: String,
    #[serde(rename = "Manufacturer")]
    pub manufacturer: String,
    #[serde(rename = "MPN")]
    pub mpn: String,
    #[serde(rename = "Datasheet")]
    pub datasheet: String,
    /// Lower wins; `None` when the cell is empty or not a number
    #[serde(rename = "Priority")]
    pub priority: Option<i64>,
    #[serde(rename = "Checked")]
    pub checked: String,
    /// Name of the store the row came from
    #[serde(skip)]
    pub store: String,
}

impl PartSource {
    fn from_row(store: &CsvStore, row: &[String]) -> Self {
        let get = |name: &str| {
            store
                .find_column(name)
                .and_then(|idx| row.get(idx))
                .cloned()
                .unwrap_or_default()
        };

        Self {
            ipn: get(IPN_COLUMN),
            description: get("Description"),
            footprint: get("Footprint"),
            value: get("Value"),
            manufacturer: get("Manufacturer"),
            mpn: get("MPN"),
            datasheet: get("Datasheet"),
            priority: get("Priority").trim().parse().ok(),
            checked: get("Checked"),
            store: store.name().to_string(),
        }
    }
}

fn by_priority(a: &PartSource, b: &PartSource) -> Ordering {
    match (a.priority, b.priority) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort sources by priority and share description, footprint and value
///
/// The highest priority source is completed from the remaining ones (first
/// non-empty value in priority order wins), then every source gets the
/// fields it lacks from that completed base.
pub fn merge_sources(found: &mut [PartSource]) {
    found.sort_by(by_priority);

    let Some((base, rest)) = found.split_first_mut() else {
        return;
    };

    for other in rest.iter() {
        if base.description.is_empty() && !other.description.is_empty() {
            base.description = other.description.clone();
        }
        if base.footprint.is_empty() && !other.footprint.is_empty() {
            base.footprint = other.footprint.clone();
        }
        if base.value.is_empty() && !other.value.is_empty() {
            base.value = other.value.clone();
        }
    }

    for other in rest.iter_mut() {
        if other.description.is_empty() {
            other.description = base.description.clone();
        }
        if other.footprint.is_empty() {
            other.footprint = base.footprint.clone();
        }
        if other.value.is_empty() {
            other.value = base.value.clone();
        }
    }
}

/// All stores of a partmaster directory plus a typed view of their rows
#[derive(Debug, Clone)]
pub struct Catalog {
    dir: PathBuf,
    stores: Vec<CsvStore>,
    sources: Vec<PartSource>,
}

impl Catalog {
    /// Load every store in `dir`
    ///
    /// Never fails: if the directory cannot be read, a file is malformed, or
    /// no stores exist, the catalog holds a single blank store instead.
    pub fn load(dir: &Path) -> Self {
        let stores = match CsvStore::load_all(dir) {
            Ok(stores) if !stores.is_empty() => stores,
            Ok(_) => {
                warn!(dir = %dir.display(), "no CSV files found, using a blank partmaster");
                vec![CsvStore::blank(dir)]
            }
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "failed to load partmaster, using a blank one");
                vec![CsvStore::blank(dir)]
            }
        };

        let mut catalog = Self::from_stores(dir, stores);
        // Purchased parts often only carry an MPN
        for source in &mut catalog.sources {
            if source.value.is_empty() && !source.mpn.is_empty() {
                source.value = source.mpn.clone();
            }
        }
        catalog
    }

    /// Build a catalog from stores that are already in memory, as-is
    pub fn from_stores(dir: &Path, stores: Vec<CsvStore>) -> Self {
        let sources: Vec<PartSource> = stores
            .iter()
            .flat_map(|store| store.rows.iter().map(move |row| PartSource::from_row(store, row)))
            .collect();
        debug!(stores = stores.len(), rows = sources.len(), "catalog built");

        Self {
            dir: dir.to_path_buf(),
            stores,
            sources,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn stores(&self) -> &[CsvStore] {
        &self.stores
    }

    pub fn stores_mut(&mut self) -> &mut [CsvStore] {
        &mut self.stores
    }

    /// Every row as a source, in store then row order
    pub fn sources(&self) -> &[PartSource] {
        &self.sources
    }

    /// All sources for `ipn`, merged and sorted by priority
    pub fn resolve_all(&self, ipn: &Ipn) -> Result<Vec<PartSource>, CatalogError> {
        let mut found: Vec<PartSource> = self
            .sources
            .iter()
            .filter(|s| s.ipn == ipn.as_str())
            .cloned()
            .collect();

        if found.is_empty() {
            return Err(CatalogError::NotFound(ipn.to_string()));
        }

        merge_sources(&mut found);
        Ok(found)
    }

    /// The highest priority source for `ipn`
    pub fn resolve_best(&self, ipn: &Ipn) -> Result<PartSource, CatalogError> {
        self.resolve_all(ipn)?
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::NotFound(ipn.to_string()))
    }

    /// Store and row index of the first row whose identity value is `id`
    pub fn locate(&self, id: &str) -> Option<(usize, usize)> {
        self.stores
            .iter()
            .enumerate()
            .find_map(|(s, store)| store.find_row(id).map(|r| (s, r)))
    }
}
