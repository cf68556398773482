use super::license_expression::LICENSE_REF_PREFIX;
use crate::sbom_generation::domain::RawLicense;
use std::collections::BTreeSet;

/// Value SPDX documents use when nothing is known
pub const NOASSERTION: &str = "NOASSERTION";

/// LicenseIdentifierPolicy maps upstream license entries onto SPDX identifiers
///
/// Priority order:
/// 1. the SPDX short identifier (if non-empty and not a placeholder)
/// 2. a `LicenseRef-` reference derived from the full license name
pub struct LicenseIdentifierPolicy;

impl LicenseIdentifierPolicy {
    /// Selects the identifier for one upstream license entry
    ///
    /// # Returns
    /// The identifier, or None if neither field carries a usable value
    pub fn select_identifier(license: &RawLicense) -> Option<String> {
        license
            .spdx_name
            .as_deref()
            .map(str::trim)
            .filter(|id| !Self::is_placeholder(id))
            .map(str::to_string)
            .or_else(|| {
                license
                    .name
                    .as_deref()
                    .map(str::trim)
                    .filter(|name| !Self::is_placeholder(name))
                    .map(Self::license_ref)
            })
    }

    /// Builds a `LicenseRef-` identifier; SPDX only allows `[A-Za-z0-9.-]`
    pub fn license_ref(name: &str) -> String {
        let idstring: String = name
            .trim()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        format!("{}{}", LICENSE_REF_PREFIX, idstring)
    }

    /// Conjunctive license expression over a license set
    ///
    /// Members that are themselves expressions are parenthesized, so an
    /// upstream `MIT OR Apache-2.0` keeps its meaning next to other licenses.
    pub fn expression(licenses: &BTreeSet<String>) -> String {
        match licenses.len() {
            0 => NOASSERTION.to_string(),
            1 => licenses.iter().cloned().collect(),
            _ => licenses
                .iter()
                .map(|license| {
                    if license.split_whitespace().count() > 1 {
                        format!("({})", license)
                    } else {
                        license.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join(" AND "),
        }
    }

    /// The upstream name a `LicenseRef-` identifier was derived from
    pub fn extracted_name(license: &RawLicense, identifier: &str) -> Option<String> {
        if !identifier.starts_with(LICENSE_REF_PREFIX) {
            return None;
        }
        license
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !Self::is_placeholder(name))
            .map(str::to_string)
    }

    fn is_placeholder(value: &str) -> bool {
        value.is_empty()
            || value.eq_ignore_ascii_case("UNKNOWN")
            || value.eq_ignore_ascii_case(NOASSERTION)
            || value.eq_ignore_ascii_case("NONE")
    }
}
