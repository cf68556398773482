use super::Credentials;
use crate::ports::outbound::InventoryRepository;
use crate::sbom_generation::domain::{
    DueDiligenceEntry, RawCopyright, RawInventory, RawLicense, RawRecord, RawRelationship, Scope,
    ScopeInfo, ScopeKind,
};
use crate::shared::error::SbomError;
use crate::shared::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Hosted inventory service used for the `saas` alias and when no URL is given
pub const DEFAULT_INVENTORY_URL: &str = "https://saas.whitesourcesoftware.com";

const API_PATH: &str = "/api/v1.3";
const GET_SCOPE_INVENTORY: &str = "getScopeInventory";
const GET_ORGANIZATION_PROJECTS: &str = "getOrganizationProjects";

/// Connection settings for [`InventoryClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Total attempts per request, including the first one
    pub max_retries: u32,
    /// Delay before the second attempt; doubles on every further attempt
    pub backoff_base: Duration,
}

impl Default for InventoryClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_INVENTORY_URL.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            backoff_base: Duration::from_millis(250),
        }
    }
}

impl InventoryClientConfig {
    /// Normalizes a user-supplied service URL.
    ///
    /// `saas` (any case) selects the hosted service, a missing scheme
    /// defaults to https, and trailing slashes are dropped.
    pub fn resolve_base_url(url: &str) -> String {
        let trimmed = url.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("saas") {
            return DEFAULT_INVENTORY_URL.to_string();
        }
        let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("https://{}", trimmed)
        };
        with_scheme.trim_end_matches('/').to_string()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InventoryRequest<'a> {
    request_type: &'a str,
    user_key: &'a str,
    org_token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope_token: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InventoryResponse {
    #[serde(default)]
    scope: Option<WireScope>,
    #[serde(default)]
    last_updated: Option<String>,
    /// Decoded one entry at a time so a bad entry only drops itself
    #[serde(default)]
    libraries: Vec<serde_json::Value>,
    #[serde(default)]
    relationships: Vec<serde_json::Value>,
    #[serde(default)]
    due_diligence: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct WireScope {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireLibrary {
    #[serde(default, alias = "key")]
    key_uuid: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default, rename = "type")]
    library_type: Option<String>,
    #[serde(default)]
    group_id: Option<String>,
    #[serde(default)]
    artifact_id: Option<String>,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    sha1: Option<String>,
    #[serde(default)]
    references: Option<WireReferences>,
    #[serde(default)]
    licenses: Vec<WireLicense>,
    #[serde(default)]
    copyright_references: Vec<WireCopyright>,
}

#[derive(Debug, Deserialize)]
struct WireReferences {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireLicense {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    spdx_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireCopyright {
    #[serde(default)]
    copyright: Option<String>,
    #[serde(default)]
    author: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireRelationship {
    from: String,
    to: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireDueDiligence {
    #[serde(default)]
    library: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    author: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProjectsResponse {
    #[serde(default)]
    projects: Vec<WireProject>,
}

#[derive(Debug, Deserialize)]
struct WireProject {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    token: Option<String>,
}

impl InventoryResponse {
    fn into_raw(self, scope: &Scope) -> RawInventory {
        let (name, kind) = match self.scope {
            Some(wire) => (
                wire.name,
                wire.kind
                    .as_deref()
                    .map(ScopeKind::from_label)
                    .unwrap_or(ScopeKind::Unknown),
            ),
            None => (None, ScopeKind::Unknown),
        };

        let mut inventory = RawInventory::new(ScopeInfo::new(scope.clone(), name, kind));
        inventory.last_updated = self.last_updated;
        inventory.records = self
            .libraries
            .into_iter()
            .enumerate()
            .map(|(index, value)| library_record(index, value))
            .collect();
        inventory.relationships = self
            .relationships
            .into_iter()
            .map(relationship_record)
            .collect();
        inventory.due_diligence = self
            .due_diligence
            .into_iter()
            .filter_map(|value| serde_json::from_value::<WireDueDiligence>(value).ok())
            .filter_map(|entry| {
                Some(DueDiligenceEntry {
                    library: entry.library?,
                    license_name: entry.name?,
                    author: entry.author,
                })
            })
            .collect();
        inventory
    }
}

/// Names the target of a request: the scope token, or the organization
/// for organization-wide requests
fn scope_label(scope: Option<&Scope>) -> String {
    scope.map_or_else(|| "<organization>".to_string(), |s| s.token().to_string())
}

/// String field of an undecodable entry, kept so diagnostics can name it
fn string_field(value: &serde_json::Value, field: &str) -> Option<String> {
    value.get(field).and_then(serde_json::Value::as_str).map(str::to_string)
}

/// Converts one library entry. An entry that does not decode becomes a
/// record without name or version, which normalization counts as malformed.
fn library_record(index: usize, value: serde_json::Value) -> RawRecord {
    match serde_json::from_value::<WireLibrary>(value.clone()) {
        Ok(library) => library.into_raw(index),
        Err(e) => {
            let key = string_field(&value, "keyUuid")
                .or_else(|| string_field(&value, "key"))
                .unwrap_or_else(|| format!("#{}", index));
            tracing::warn!(record = %key, error = %e, "undecodable library entry");
            RawRecord {
                key,
                ..RawRecord::default()
            }
        }
    }
}

/// Converts one relationship entry. An undecodable entry keeps an empty
/// kind, which normalization counts as a malformed relationship.
fn relationship_record(value: serde_json::Value) -> RawRelationship {
    match serde_json::from_value::<WireRelationship>(value.clone()) {
        Ok(rel) => RawRelationship {
            from_key: rel.from,
            to_key: rel.to,
            kind: rel.kind.unwrap_or_else(|| "DEPENDS_ON".to_string()),
        },
        Err(e) => {
            tracing::warn!(error = %e, "undecodable relationship entry");
            RawRelationship {
                from_key: string_field(&value, "from").unwrap_or_default(),
                to_key: string_field(&value, "to").unwrap_or_default(),
                kind: String::new(),
            }
        }
    }
}

impl WireLibrary {
    fn into_raw(self, index: usize) -> RawRecord {
        RawRecord {
            // Synthetic key for records the service sent without one
            key: self.key_uuid.unwrap_or_else(|| format!("#{}", index)),
            name: self.name,
            version: self.version,
            library_type: self.library_type,
            group_id: self.group_id,
            artifact_id: self.artifact_id,
            filename: self.filename,
            sha1: self.sha1,
            url: self.references.and_then(|r| r.url),
            licenses: self
                .licenses
                .into_iter()
                .map(|l| RawLicense {
                    name: l.name,
                    spdx_name: l.spdx_name,
                })
                .collect(),
            copyright_references: self
                .copyright_references
                .into_iter()
                .map(|c| RawCopyright {
                    copyright: c.copyright,
                    author: c.author,
                })
                .collect(),
        }
    }
}

/// InventoryClient adapter for the remote inventory service
///
/// Implements the InventoryRepository port over the service's single JSON
/// endpoint. Transient failures (transport errors, 408, 429 and 5xx) are
/// retried with exponential backoff; authentication and not-found answers
/// fail immediately.
///
/// Credentials travel only in request bodies. Every message derived from a
/// response is passed through [`Credentials::redact`] before it is returned.
pub struct InventoryClient {
    client: reqwest::Client,
    credentials: Credentials,
    endpoint: String,
    max_retries: u32,
    backoff_base: Duration,
}

impl InventoryClient {
    /// Creates a client for the configured service
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built
    pub fn new(credentials: Credentials, config: InventoryClientConfig) -> Result<Self> {
        let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(user_agent)
            .build()?;

        let endpoint = format!(
            "{}{}",
            InventoryClientConfig::resolve_base_url(&config.base_url),
            API_PATH
        );

        Ok(Self {
            client,
            credentials,
            endpoint,
            max_retries: config.max_retries.max(1),
            backoff_base: config.backoff_base,
        })
    }

    /// Full URL requests are posted to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts a request, retrying transient failures
    async fn post_with_retry<T: DeserializeOwned>(
        &self,
        request_type: &str,
        scope: Option<&Scope>,
    ) -> std::result::Result<T, SbomError> {
        let mut attempt = 1;
        loop {
            match self.post_once(request_type, scope).await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    let delay = self.backoff_base * 2u32.saturating_pow(attempt - 1);
                    tracing::debug!(
                        request_type,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Transient inventory failure, retrying: {}",
                        e.kind()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn post_once<T: DeserializeOwned>(
        &self,
        request_type: &str,
        scope: Option<&Scope>,
    ) -> std::result::Result<T, SbomError> {
        let body = InventoryRequest {
            request_type,
            user_key: self.credentials.user_key(),
            org_token: self.credentials.org_token(),
            scope_token: scope.map(Scope::token),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(status, scope));
        }

        let text = response.text().await.map_err(|e| self.transport_error(e))?;
        let value: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| SbomError::MalformedRecord {
                details: format!("inventory response is not valid JSON: {}", e),
            })?;

        if let Some(code) = value.get("errorCode").and_then(serde_json::Value::as_i64) {
            let message = value
                .get("errorMessage")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("no message");
            return Err(self.envelope_error(code, message, scope));
        }

        serde_json::from_value(value).map_err(|e| SbomError::MalformedRecord {
            details: format!("unexpected {} response shape: {}", request_type, e),
        })
    }

    fn transport_error(&self, error: reqwest::Error) -> SbomError {
        let details = if error.is_timeout() {
            "request timed out".to_string()
        } else if error.is_connect() {
            format!("could not connect to {}", self.endpoint)
        } else {
            error.without_url().to_string()
        };
        SbomError::Network {
            details: self.credentials.redact(&details),
        }
    }

    /// Classifies a non-success HTTP status
    fn status_error(status: StatusCode, scope: Option<&Scope>) -> SbomError {
        let details = format!("inventory service returned {}", status);
        match status.as_u16() {
            404 => SbomError::ScopeNotFound {
                scope: scope_label(scope),
                details,
            },
            408 | 429 => SbomError::Network { details },
            code if code >= 500 => SbomError::Network { details },
            _ => SbomError::Authentication { details },
        }
    }

    /// Classifies an in-body `{errorCode, errorMessage}` answer
    fn envelope_error(&self, code: i64, message: &str, scope: Option<&Scope>) -> SbomError {
        let details = self
            .credentials
            .redact(&format!("error code {}: {}", code, message));
        match code {
            1000..=1999 => SbomError::Authentication { details },
            2000..=2999 => SbomError::ScopeNotFound {
                scope: scope_label(scope),
                details,
            },
            _ => SbomError::Network { details },
        }
    }
}

#[async_trait]
impl InventoryRepository for InventoryClient {
    async fn fetch_inventory(&self, scope: &Scope) -> Result<RawInventory> {
        tracing::debug!(scope = %scope, "Requesting scope inventory");
        let response: InventoryResponse = self
            .post_with_retry(GET_SCOPE_INVENTORY, Some(scope))
            .await?;
        let inventory = response.into_raw(scope);
        tracing::info!(
            scope = %scope,
            records = inventory.records.len(),
            relationships = inventory.relationships.len(),
            "Fetched scope inventory"
        );
        Ok(inventory)
    }

    async fn list_projects(&self) -> Result<Vec<Scope>> {
        let response: ProjectsResponse = self
            .post_with_retry(GET_ORGANIZATION_PROJECTS, None)
            .await?;

        let mut scopes = Vec::with_capacity(response.projects.len());
        for project in response.projects {
            match project.token.map(Scope::new) {
                Some(Ok(scope)) => scopes.push(scope),
                _ => tracing::warn!(
                    name = project.name.as_deref().unwrap_or("<unnamed>"),
                    "Skipping project without a token"
                ),
            }
        }
        scopes.sort();
        scopes.dedup();
        Ok(scopes)
    }
}
