mod license_expression;
mod license_identifier;
mod supplier_resolution;

pub use license_expression::{LicenseExpression, LICENSE_REF_PREFIX};
pub use license_identifier::{LicenseIdentifierPolicy, NOASSERTION};
pub use supplier_resolution::SupplierResolution;
