use crate::shared::error::SbomError;
use std::fmt;

/// Kind of inventory unit a scope token points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeKind {
    Organization,
    Product,
    Project,
    Unknown,
}

impl ScopeKind {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "organization" | "org" => ScopeKind::Organization,
            "product" => ScopeKind::Product,
            "project" => ScopeKind::Project,
            _ => ScopeKind::Unknown,
        }
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScopeKind::Organization => "organization",
            ScopeKind::Product => "product",
            ScopeKind::Project => "project",
            ScopeKind::Unknown => "scope",
        };
        write!(f, "{}", label)
    }
}

/// Opaque identifier of one inventory unit, supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Scope(String);

impl Scope {
    pub fn new(token: impl Into<String>) -> Result<Self, SbomError> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(SbomError::Usage {
                message: "Scope token cannot be empty".to_string(),
            });
        }
        Ok(Self(token))
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Upstream description of a scope, returned alongside its inventory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeInfo {
    scope: Scope,
    name: String,
    kind: ScopeKind,
}

impl ScopeInfo {
    pub fn new(scope: Scope, name: Option<String>, kind: ScopeKind) -> Self {
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| scope.token().to_string());
        Self { scope, name, kind }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ScopeKind {
        &self.kind
    }
}
