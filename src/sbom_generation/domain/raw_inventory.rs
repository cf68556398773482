use super::ScopeInfo;

/// License as reported by the inventory service
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawLicense {
    pub name: Option<String>,
    pub spdx_name: Option<String>,
}

/// Copyright reference attached to a library record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCopyright {
    pub copyright: Option<String>,
    pub author: Option<String>,
}

/// One library record, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    /// Record key used by relationships to reference this record
    pub key: String,
    pub name: Option<String>,
    pub version: Option<String>,
    pub library_type: Option<String>,
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub filename: Option<String>,
    pub sha1: Option<String>,
    pub url: Option<String>,
    pub licenses: Vec<RawLicense>,
    pub copyright_references: Vec<RawCopyright>,
}

/// Edge between two records, referenced by record key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRelationship {
    pub from_key: String,
    pub to_key: String,
    pub kind: String,
}

/// Due-diligence entry: author attribution per (library file, license)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DueDiligenceEntry {
    pub library: String,
    pub license_name: String,
    pub author: Option<String>,
}

/// Everything the inventory service returned for one scope
#[derive(Debug, Clone)]
pub struct RawInventory {
    pub scope: ScopeInfo,
    /// RFC 3339 timestamp of the last upstream inventory change
    pub last_updated: Option<String>,
    pub records: Vec<RawRecord>,
    pub relationships: Vec<RawRelationship>,
    pub due_diligence: Vec<DueDiligenceEntry>,
}

impl RawInventory {
    pub fn new(scope: ScopeInfo) -> Self {
        Self {
            scope,
            last_updated: None,
            records: Vec::new(),
            relationships: Vec::new(),
            due_diligence: Vec::new(),
        }
    }
}
