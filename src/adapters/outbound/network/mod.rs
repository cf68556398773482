/// Network adapters for the remote inventory service
mod credentials;
mod inventory_client;

pub use credentials::Credentials;
pub use inventory_client::{InventoryClient, InventoryClientConfig, DEFAULT_INVENTORY_URL};
