use crate::sbom_generation::domain::{RawInventory, Scope};
use crate::shared::Result;
use async_trait::async_trait;

/// InventoryRepository port for fetching dependency inventories
///
/// This port abstracts the remote inventory service. Credentials belong to
/// the implementation (passed to its constructor), never to call sites.
///
/// # Async Support
/// Implementations must be `Send + Sync` so several scopes can be fetched
/// concurrently.
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Fetches the raw inventory records of one scope
    ///
    /// # Errors
    /// Returns an error wrapping `SbomError`:
    /// - `Authentication` when the credentials are rejected
    /// - `ScopeNotFound` when the scope token is unknown
    /// - `Network` when the service stays unreachable after retries
    async fn fetch_inventory(&self, scope: &Scope) -> Result<RawInventory>;

    /// Lists the project scopes of the organization
    ///
    /// # Errors
    /// Same error kinds as [`InventoryRepository::fetch_inventory`]
    async fn list_projects(&self) -> Result<Vec<Scope>>;
}
