/// Data license every generated document is published under
pub const DATA_LICENSE: &str = "CC0-1.0";

/// SPDX specification version the encoders target
pub const SPDX_VERSION: &str = "SPDX-2.3";

/// Party named in the document's creation info
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Creator {
    name: String,
    email: Option<String>,
}

impl Creator {
    pub fn new(name: impl Into<String>, email: Option<String>) -> Self {
        Self {
            name: name.into(),
            email: email.filter(|e| !e.trim().is_empty()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// `Name (email)` or just `Name`, as SPDX creator fields expect
    pub fn display(&self) -> String {
        match &self.email {
            Some(email) => format!("{} ({})", self.name, email),
            None => self.name.clone(),
        }
    }
}

/// SbomMetadata value object representing document-level metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SbomMetadata {
    document_name: String,
    namespace: String,
    timestamp: String,
    tool_name: String,
    tool_version: String,
    organization: Option<Creator>,
    person: Option<Creator>,
}

impl SbomMetadata {
    pub fn new(
        document_name: String,
        namespace: String,
        timestamp: String,
        tool_name: String,
        tool_version: String,
    ) -> Self {
        Self {
            document_name,
            namespace,
            timestamp,
            tool_name,
            tool_version,
            organization: None,
            person: None,
        }
    }

    pub fn with_organization(mut self, organization: Creator) -> Self {
        self.organization = Some(organization);
        self
    }

    pub fn with_person(mut self, person: Creator) -> Self {
        self.person = Some(person);
        self
    }

    pub fn document_name(&self) -> &str {
        &self.document_name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn tool_version(&self) -> &str {
        &self.tool_version
    }

    pub fn organization(&self) -> Option<&Creator> {
        self.organization.as_ref()
    }

    pub fn person(&self) -> Option<&Creator> {
        self.person.as_ref()
    }

    /// Creator lines in SPDX `Type: value` form, tool first
    pub fn creators(&self) -> Vec<String> {
        let mut creators = vec![format!("Tool: {}-{}", self.tool_name, self.tool_version)];
        if let Some(org) = &self.organization {
            creators.push(format!("Organization: {}", org.display()));
        }
        if let Some(person) = &self.person {
            creators.push(format!("Person: {}", person.display()));
        }
        creators
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sbom_metadata_new() {
        let metadata = SbomMetadata::new(
            "demo-go SBOM report".to_string(),
            "https://example.com/spdx/demo-go-1234".to_string(),
            "2024-01-01T00:00:00Z".to_string(),
            "sbom-generator".to_string(),
            "0.4.0".to_string(),
        );

        assert_eq!(metadata.document_name(), "demo-go SBOM report");
        assert_eq!(metadata.timestamp(), "2024-01-01T00:00:00Z");
        assert_eq!(metadata.tool_name(), "sbom-generator");
        assert!(metadata.organization().is_none());
    }

    #[test]
    fn test_creators_order_and_format() {
        let metadata = SbomMetadata::new(
            "doc".to_string(),
            "ns".to_string(),
            "2024-01-01T00:00:00Z".to_string(),
            "sbom-generator".to_string(),
            "0.4.0".to_string(),
        )
        .with_organization(Creator::new("Acme", Some("oss@acme.io".to_string())))
        .with_person(Creator::new("Jane Doe", Some("".to_string())));

        assert_eq!(
            metadata.creators(),
            vec![
                "Tool: sbom-generator-0.4.0".to_string(),
                "Organization: Acme (oss@acme.io)".to_string(),
                "Person: Jane Doe".to_string(),
            ]
        );
    }
}
