use async_trait::async_trait;
use sbom_generator::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock InventoryRepository serving canned inventories by scope token
#[derive(Default, Clone)]
pub struct MockInventoryRepository {
    inventories: HashMap<String, RawInventory>,
    failures: HashMap<String, String>,
    projects: Vec<Scope>,
    pub fetched: Arc<Mutex<Vec<String>>>,
}

impl MockInventoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inventory(mut self, inventory: RawInventory) -> Self {
        self.inventories
            .insert(inventory.scope.scope().token().to_string(), inventory);
        self
    }

    /// Fetching `scope` fails with a not-found error
    pub fn with_missing_scope(mut self, scope: &str) -> Self {
        self.failures
            .insert(scope.to_string(), "inventory service returned 404 Not Found".to_string());
        self
    }

    pub fn with_projects(mut self, tokens: &[&str]) -> Self {
        self.projects = tokens.iter().map(|t| Scope::new(*t).unwrap()).collect();
        self
    }

    pub fn fetched_scopes(&self) -> Vec<String> {
        let mut fetched = self.fetched.lock().unwrap().clone();
        fetched.sort();
        fetched
    }
}

#[async_trait]
impl InventoryRepository for MockInventoryRepository {
    async fn fetch_inventory(&self, scope: &Scope) -> Result<RawInventory> {
        self.fetched.lock().unwrap().push(scope.token().to_string());
        if let Some(details) = self.failures.get(scope.token()) {
            return Err(SbomError::ScopeNotFound {
                scope: scope.token().to_string(),
                details: details.clone(),
            }
            .into());
        }
        self.inventories
            .get(scope.token())
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no inventory registered for {}", scope.token()))
    }

    async fn list_projects(&self) -> Result<Vec<Scope>> {
        Ok(self.projects.clone())
    }
}
