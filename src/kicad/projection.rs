//! Projection of the partmaster onto KiCad categories, parts and revisions
//!
//! Reads are computed fresh from the loaded catalog on every call. Writes
//! modify one row in memory, save its store, and reload the whole catalog
//! from disk so that later reads only ever see what was persisted.

use std::collections::BTreeSet;
use std::path::Path;
use tracing::info;

use crate::core::catalog::{Catalog, CatalogError};
use crate::core::ipn::{category_of, revision_of, MAX_REVISION};
use crate::core::store::{CsvStore, IPN_COLUMN};
use crate::kicad::model::{
    source_columns, Category, FieldMap, PartDetail, PartSummary, PartUpdate,
};
use crate::kicad::tables::CategoryTables;

/// Column used for part names and descriptions
pub const DESCRIPTION_COLUMN: &str = "Description";

/// Category implied by a store's file name (`cap.csv` -> `CAP`)
fn store_category(store: &CsvStore) -> Option<String> {
    let name = store.name().to_uppercase();
    (name.len() == 3).then_some(name)
}

pub struct CatalogProjection {
    catalog: Catalog,
    tables: CategoryTables,
}

impl CatalogProjection {
    pub fn new(catalog: Catalog, tables: CategoryTables) -> Self {
        Self { catalog, tables }
    }

    /// Load the partmaster in `dir` with the standard category tables
    pub fn open(dir: &Path) -> Self {
        Self::new(Catalog::load(dir), CategoryTables::standard())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Re-read every store from disk
    pub fn reload(&mut self) {
        let dir = self.catalog.dir().to_path_buf();
        self.catalog = Catalog::load(&dir);
        info!(dir = %dir.display(), stores = self.catalog.stores().len(), "partmaster reloaded");
    }

    /// Categories from three-letter file names and from every IPN, sorted
    pub fn list_categories(&self) -> Vec<Category> {
        let mut codes = BTreeSet::new();

        for store in self.catalog.stores() {
            if let Some(code) = store_category(store) {
                codes.insert(code);
            }
            if let Some(col) = store.find_column(IPN_COLUMN) {
                for row in &store.rows {
                    if let Some(code) = row.get(col).and_then(|ipn| category_of(ipn)) {
                        codes.insert(code.to_string());
                    }
                }
            }
        }

        codes
            .into_iter()
            .map(|code| Category {
                name: self.tables.display_name(&code),
                description: self.tables.description(&code),
                id: code,
            })
            .collect()
    }

    /// Parts whose category matches `category_id`
    ///
    /// A row's category comes from its IPN when it has one, otherwise from
    /// the store's file name.
    pub fn list_parts(&self, category_id: &str) -> Vec<PartSummary> {
        let mut parts = Vec::new();

        for store in self.catalog.stores() {
            let file_category = store_category(store).unwrap_or_default();
            let ipn_col = store.find_column(IPN_COLUMN);
            let desc_col = store.find_column(DESCRIPTION_COLUMN);

            for row in store.rows.iter().filter(|r| !r.is_empty()) {
                let ipn = ipn_col
                    .and_then(|c| row.get(c))
                    .map(String::as_str)
                    .unwrap_or("");

                let category = if ipn.is_empty() {
                    file_category.as_str()
                } else {
                    category_of(ipn).unwrap_or("")
                };
                if category != category_id {
                    continue;
                }

                let id = if ipn.is_empty() {
                    format!("{}-unknown-{}", category_id, parts.len())
                } else {
                    ipn.to_string()
                };
                let description = desc_col
                    .and_then(|c| row.get(c))
                    .cloned()
                    .unwrap_or_default();

                parts.push(PartSummary {
                    id,
                    name: description.clone(),
                    description,
                });
            }
        }

        parts
    }

    /// Detail of the first row whose IPN is `id`
    pub fn part_detail(&self, id: &str) -> Result<PartDetail, CatalogError> {
        let (s, r) = self.locate(id)?;
        let store = &self.catalog.stores()[s];
        let row = &store.rows[r];

        let mut fields = FieldMap::new();
        let mut name = String::new();
        for (header, value) in store.headers.iter().zip(row.iter()) {
            if header.is_empty() || value.is_empty() {
                continue;
            }
            if header == DESCRIPTION_COLUMN {
                name = value.clone();
            }
            fields.insert(header.clone(), value.clone());
        }

        let category = category_of(id).unwrap_or("");
        Ok(PartDetail {
            id: id.to_string(),
            name,
            symbol_id_str: self.tables.symbol(category).to_string(),
            exclude_from_bom: "false".to_string(),
            fields,
            revision: revision_of(id).unwrap_or("").to_string(),
        })
    }

    /// Write a new description and/or manufacturer sources for a part
    pub fn update_part(&mut self, id: &str, update: &PartUpdate) -> Result<PartDetail, CatalogError> {
        let (s, r) = self.locate(id)?;
        let store = &mut self.catalog.stores_mut()[s];
        store.pad_row(r);

        if !update.description.is_empty() {
            let col = store.ensure_column(DESCRIPTION_COLUMN);
            store.rows[r][col] = update.description.clone();
        }

        for (i, source) in update.sources.iter().enumerate() {
            let (mfr_header, mpn_header) = source_columns(i);
            let mfr_col = store.ensure_column(&mfr_header);
            let mpn_col = store.ensure_column(&mpn_header);
            store.rows[r][mfr_col] = source.manufacturer.clone();
            store.rows[r][mpn_col] = source.mpn.clone();
        }

        store.save()?;
        info!(ipn = id, store = store.name(), sources = update.sources.len(), "part updated");

        self.reload();
        self.part_detail(id)
    }

    /// Copy a part's row under the next revision number
    ///
    /// The original row stays in place.
    pub fn start_new_revision(&mut self, id: &str) -> Result<PartDetail, CatalogError> {
        let (s, r) = self.locate(id)?;
        let store = &mut self.catalog.stores_mut()[s];
        let ipn_col = store
            .find_column(IPN_COLUMN)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;

        let current = store.rows[r][ipn_col].clone();
        let parts: Vec<&str> = current.split('-').collect();
        let [category, sequence, revision] = parts.as_slice() else {
            return Err(CatalogError::InvalidFormat(current.clone()));
        };
        let revision: i64 = revision
            .parse()
            .map_err(|_| CatalogError::InvalidFormat(current.clone()))?;

        if revision >= MAX_REVISION {
            return Err(CatalogError::RevisionOverflow(current.clone()));
        }
        let next = revision + 1;
        let new_ipn = format!("{}-{}-{:04}", category, sequence, next);

        let mut new_row = store.rows[r].clone();
        new_row.resize(store.headers.len(), String::new());
        new_row[ipn_col] = new_ipn.clone();
        store.rows.push(new_row);

        store.save()?;
        info!(from = %current, to = %new_ipn, store = store.name(), "new revision");

        self.reload();
        self.part_detail(&new_ipn)
    }

    fn locate(&self, id: &str) -> Result<(usize, usize), CatalogError> {
        if id.is_empty() {
            return Err(CatalogError::NotFound(id.to_string()));
        }
        self.catalog
            .locate(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::ErrorKind;
    use crate::kicad::model::SourceUpdate;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn setup(files: &[(&str, &str)]) -> (TempDir, CatalogProjection) {
        let dir = tempdir().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        let projection = CatalogProjection::open(dir.path());
        (dir, projection)
    }

    const CAP: &str = "IPN,Description,Footprint,Value,Manufacturer,MPN
CAP-001-0001,100n X7R 16V,C_0402,100n,Murata,GRM155R71C104KA88D
CAP-002-0004,10u X5R 10V,C_0805,10u,Samsung,CL21A106KPFNNNE
";

    #[test]
    fn test_list_categories_from_files_and_ipns() {
        let (_dir, p) = setup(&[
            ("cap.csv", CAP),
            ("misc.csv", "IPN,Description\nRES-001-0001,1k\nbogus,nothing\nZZZ-001-0001,odd\n"),
            ("led.csv", "IPN,Description\n"),
        ]);

        let cats = p.list_categories();
        let ids: Vec<&str> = cats.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["CAP", "LED", "RES", "ZZZ"]);
        assert_eq!(cats[0].name, "Capacitors");
        assert_eq!(cats[3].name, "ZZZ");
        assert_eq!(cats[3].description, "ZZZ components");
    }

    #[test]
    fn test_list_parts_by_category() {
        let (_dir, p) = setup(&[
            ("cap.csv", "IPN,Description\nCAP-001-0001,100n\n,loose cap\nRES-001-0001,in the wrong file\n"),
            ("res.csv", "IPN,Description\nRES-002-0001,10k\n"),
        ]);

        let caps = p.list_parts("CAP");
        assert_eq!(caps.len(), 2);
        assert_eq!(caps[0].id, "CAP-001-0001");
        assert_eq!(caps[0].name, "100n");
        assert_eq!(caps[0].description, "100n");
        assert_eq!(caps[1].id, "CAP-unknown-1");
        assert_eq!(caps[1].name, "loose cap");

        let res = p.list_parts("RES");
        let ids: Vec<&str> = res.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["RES-001-0001", "RES-002-0001"]);

        assert!(p.list_parts("DIO").is_empty());
    }

    #[test]
    fn test_part_detail() {
        let (_dir, p) = setup(&[("cap.csv", CAP)]);
        let detail = p.part_detail("CAP-002-0004").unwrap();
        assert_eq!(detail.name, "10u X5R 10V");
        assert_eq!(detail.symbol_id_str, "Device:C");
        assert_eq!(detail.exclude_from_bom, "false");
        assert_eq!(detail.revision, "0004");
        let keys: Vec<&str> = detail.fields.keys().collect();
        assert_eq!(keys, vec!["IPN", "Description", "Footprint", "Value", "Manufacturer", "MPN"]);

        let err = p.part_detail("CAP-009-0001").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Missing);
    }

    #[test]
    fn test_part_detail_skips_empty_cells_and_headers() {
        let (_dir, p) = setup(&[("parts.csv", "IPN,,Value,MPN\nXYZ-001-0001,hidden,,ABC\n")]);
        let detail = p.part_detail("XYZ-001-0001").unwrap();
        let keys: Vec<&str> = detail.fields.keys().collect();
        assert_eq!(keys, vec!["IPN", "MPN"]);
        assert_eq!(detail.symbol_id_str, "Device:Device");
        assert!(detail.name.is_empty());
    }

    #[test]
    fn test_update_part_writes_columns_and_reloads() {
        let (dir, mut p) = setup(&[("cap.csv", "IPN,Description\nCAP-001-0001,old\nCAP-001-0002\n")]);

        let update = PartUpdate {
            description: "new description".into(),
            sources: vec![
                SourceUpdate {
                    manufacturer: "Murata".into(),
                    mpn: "GRM155".into(),
                },
                SourceUpdate {
                    manufacturer: "TDK".into(),
                    mpn: "C1005".into(),
                },
            ],
        };
        let detail = p.update_part("CAP-001-0001", &update).unwrap();
        assert_eq!(detail.name, "new description");
        assert_eq!(detail.fields.get("Manufacturer2"), Some("TDK"));
        assert_eq!(detail.fields.get("MPN"), Some("GRM155"));

        let content = fs::read_to_string(dir.path().join("cap.csv")).unwrap();
        assert_eq!(
            content,
            "IPN,Description,Manufacturer,MPN,Manufacturer2,MPN2\n\
             CAP-001-0001,new description,Murata,GRM155,TDK,C1005\n\
             CAP-001-0002,,,,\n"
        );
    }

    #[test]
    fn test_update_part_empty_description_keeps_old() {
        let (_dir, mut p) = setup(&[("cap.csv", "IPN,Description\nCAP-001-0001,keep me\n")]);
        let detail = p.update_part("CAP-001-0001", &PartUpdate::default()).unwrap();
        assert_eq!(detail.name, "keep me");
    }

    #[test]
    fn test_update_part_not_found() {
        let (_dir, mut p) = setup(&[("cap.csv", CAP)]);
        let err = p.update_part("CAP-404-0001", &PartUpdate::default()).unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[test]
    fn test_start_new_revision() {
        let (dir, mut p) = setup(&[("cap.csv", CAP)]);
        let detail = p.start_new_revision("CAP-002-0004").unwrap();
        assert_eq!(detail.id, "CAP-002-0005");
        assert_eq!(detail.revision, "0005");
        assert_eq!(detail.name, "10u X5R 10V");

        // original is kept and both are on disk
        assert!(p.part_detail("CAP-002-0004").is_ok());
        let content = fs::read_to_string(dir.path().join("cap.csv")).unwrap();
        assert!(content.contains("CAP-002-0004,"));
        assert!(content.ends_with("CAP-002-0005,10u X5R 10V,C_0805,10u,Samsung,CL21A106KPFNNNE\n"));
    }

    #[test]
    fn test_start_new_revision_loose_identifier() {
        let (_dir, mut p) = setup(&[("misc.csv", "IPN,Description\nab-12-7,odd\nab-12,bad\nab-12-x,bad\n")]);
        let detail = p.start_new_revision("ab-12-7").unwrap();
        assert_eq!(detail.id, "ab-12-0008");
        assert!(detail.revision.is_empty());

        let err = p.start_new_revision("ab-12").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidFormat(_)));
        let err = p.start_new_revision("ab-12-x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Rejected);
    }

    #[test]
    fn test_start_new_revision_overflow() {
        let (dir, mut p) = setup(&[("cap.csv", "IPN,Description\nCAP-001-9999,max\n")]);
        let err = p.start_new_revision("CAP-001-9999").unwrap_err();
        assert!(matches!(err, CatalogError::RevisionOverflow(_)));
        let content = fs::read_to_string(dir.path().join("cap.csv")).unwrap();
        assert_eq!(content, "IPN,Description\nCAP-001-9999,max\n");
    }

    #[test]
    fn test_start_new_revision_huge_revision_is_rejected() {
        let row = "IPN,Description\nCAP-001-9223372036854775807,x\n";
        let (dir, mut p) = setup(&[("cap.csv", row)]);
        let err = p.start_new_revision("CAP-001-9223372036854775807").unwrap_err();
        assert!(matches!(err, CatalogError::RevisionOverflow(_)));
        assert_eq!(err.kind(), ErrorKind::Rejected);
        let content = fs::read_to_string(dir.path().join("cap.csv")).unwrap();
        assert_eq!(content, row);
    }

    #[test]
    fn test_update_part_pads_short_row() {
        let (dir, mut p) = setup(&[("cap.csv", "IPN,Description,Value\nCAP-001-0001\n")]);
        let update = PartUpdate {
            description: "new".into(),
            sources: vec![],
        };
        let detail = p.update_part("CAP-001-0001", &update).unwrap();
        assert_eq!(detail.name, "new");
        let content = fs::read_to_string(dir.path().join("cap.csv")).unwrap();
        assert_eq!(content, "IPN,Description,Value\nCAP-001-0001,new,\n");
    }

    #[test]
    fn test_start_new_revision_pads_short_row() {
        let (dir, mut p) = setup(&[("cap.csv", "IPN,Description,Value\nCAP-001-0001\n")]);
        p.start_new_revision("CAP-001-0001").unwrap();
        let content = fs::read_to_string(dir.path().join("cap.csv")).unwrap();
        assert!(content.ends_with("CAP-001-0002,,\n"));
    }
}
