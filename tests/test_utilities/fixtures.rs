use sbom_generator::sbom_generation::domain::{
    RawInventory, RawLicense, RawRecord, RawRelationship, Scope, ScopeInfo, ScopeKind,
};

/// Credentials used by every test; assertions check they never leak
pub const USER_KEY: &str = "uk-3f9a1c77-secret";
pub const ORG_TOKEN: &str = "org-b41d0e2a-secret";

fn record(key: &str, name: &str, version: &str) -> RawRecord {
    RawRecord {
        key: key.to_string(),
        name: Some(name.to_string()),
        version: Some(version.to_string()),
        library_type: Some("go".to_string()),
        ..RawRecord::default()
    }
}

/// demo-go: A@1.0 (MIT) depends on B@2.0
pub fn demo_inventory(token: &str) -> RawInventory {
    let scope = ScopeInfo::new(
        Scope::new(token).unwrap(),
        Some("Demo Go".to_string()),
        ScopeKind::Project,
    );
    let mut inventory = RawInventory::new(scope);
    inventory.last_updated = Some("2024-01-02T03:04:05Z".to_string());

    let mut a = record("a", "A", "1.0");
    a.licenses = vec![RawLicense {
        name: Some("MIT".to_string()),
        spdx_name: Some("MIT".to_string()),
    }];
    inventory.records = vec![a, record("b", "B", "2.0")];
    inventory.relationships = vec![RawRelationship {
        from_key: "a".to_string(),
        to_key: "b".to_string(),
        kind: "DEPENDS_ON".to_string(),
    }];
    inventory
}

/// The inventory service's answer for demo-go
pub fn demo_inventory_json() -> String {
    serde_json::json!({
        "scope": { "name": "Demo Go", "type": "project" },
        "lastUpdated": "2024-01-02T03:04:05Z",
        "libraries": [
            {
                "keyUuid": "a",
                "name": "A",
                "version": "1.0",
                "type": "go",
                "licenses": [{ "name": "MIT", "spdxName": "MIT" }]
            },
            { "keyUuid": "b", "name": "B", "version": "2.0", "type": "go" }
        ],
        "relationships": [{ "from": "a", "to": "b", "type": "DEPENDS_ON" }]
    })
    .to_string()
}

/// In-body error answer; the message echoes the user key like some services do
pub fn error_envelope_json(code: i64) -> String {
    serde_json::json!({
        "errorCode": code,
        "errorMessage": format!("Invalid credentials for userKey {}", USER_KEY),
    })
    .to_string()
}
