use abap_adt_api::{AdtConnection, SapCredentials};

/// Connection for integration tests.
///
/// Panics with setup instructions when the environment is incomplete.
pub fn connect() -> AdtConnection {
    let creds = SapCredentials::from_env().unwrap_or_else(|e| {
        panic!(
            "\n\n\
            Integration tests need an ABAP system: {e}\n\
            \n\
            Export SAP_URL plus SAP_USERNAME/SAP_PASSWORD (basic auth),\n\
            or SAP_AUTH_TYPE=jwt with SAP_JWT_TOKEN. SAP_CLIENT is optional.\n\n"
        )
    });
    creds.connect().expect("valid connection settings")
}

/// A fresh object name with the given prefix, unique per run.
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}{}", chrono::Utc::now().format("%y%m%d%H%M%S"))
}

pub const LOCAL_PACKAGE: &str = "$TMP";
