use crate::sbom_generation::domain::{DueDiligenceEntry, RawRecord};
use std::collections::HashMap;

/// SupplierResolution decides who supplied a library
///
/// Priority order:
/// 1. due-diligence author recorded for (library file name, license name)
/// 2. the last author named in the library's copyright references
pub struct SupplierResolution {
    authors: HashMap<(String, String), String>,
}

impl SupplierResolution {
    /// Indexes due-diligence entries; upstream marks some library names with a
    /// trailing `*`, which is not part of the file name
    pub fn new(due_diligence: &[DueDiligenceEntry]) -> Self {
        let authors = due_diligence
            .iter()
            .filter_map(|entry| {
                let author = entry.author.as_deref()?.trim();
                if author.is_empty() {
                    return None;
                }
                let library = entry.library.trim_end_matches('*').to_string();
                Some(((library, entry.license_name.clone()), author.to_string()))
            })
            .collect();
        Self { authors }
    }

    pub fn resolve(&self, record: &RawRecord) -> Option<String> {
        self.from_due_diligence(record)
            .or_else(|| Self::from_copyright_references(record))
    }

    fn from_due_diligence(&self, record: &RawRecord) -> Option<String> {
        let filename = record.filename.as_deref()?;
        record.licenses.iter().find_map(|license| {
            let name = license.name.as_deref()?;
            self.authors
                .get(&(filename.to_string(), name.to_string()))
                .cloned()
        })
    }

    fn from_copyright_references(record: &RawRecord) -> Option<String> {
        let authors: Vec<&str> = record
            .copyright_references
            .iter()
            .filter_map(|c| c.author.as_deref())
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .collect();

        if authors.len() > 1 {
            tracing::debug!(
                library = record.name.as_deref().unwrap_or(&record.key),
                count = authors.len(),
                "multiple copyright authors, using the last one"
            );
        }
        authors.last().map(|a| a.to_string())
    }
}
