//! Connectivity check against an ADT system.
//!
//! Fetches a CSRF token with the credentials from the environment and, when
//! a pattern is given, runs a quick search with it.
//!
//! ```sh
//! export SAP_URL=https://sap.example.com:44300 SAP_USERNAME=DEVELOPER SAP_PASSWORD=...
//! RUST_LOG=abap_adt_client=debug cargo run --bin adt-ping -- 'ZCL_*'
//! ```

use abap_adt_api::{RepositoryClient, SapCredentials};
use tracing_subscriber::EnvFilter;

const MAX_RESULTS: u32 = 20;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let creds = SapCredentials::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!();
        eprintln!("  Set SAP_URL plus SAP_USERNAME/SAP_PASSWORD,");
        eprintln!("  or SAP_AUTH_TYPE=jwt with SAP_JWT_TOKEN.");
        std::process::exit(1);
    });

    let conn = creds.connect().unwrap_or_else(|e| {
        eprintln!("Error: invalid connection settings: {e}");
        std::process::exit(1);
    });

    if let Err(e) = conn.fetch_csrf_token().await {
        eprintln!("Error: {} is not reachable: {e}", creds.url());
        std::process::exit(1);
    }
    println!(
        "Connected to {} (client {})",
        creds.url(),
        creds.client().unwrap_or("default")
    );

    let Some(pattern) = std::env::args().nth(1) else {
        return;
    };

    let repo = RepositoryClient::new(conn);
    match repo.search(&pattern, None, MAX_RESULTS).await {
        Ok(hits) => {
            for hit in &hits {
                println!(
                    "{:<12} {:<40} {}",
                    hit.object_type,
                    hit.name,
                    hit.description.as_deref().unwrap_or_default()
                );
            }
            println!("{} result(s)", hits.len());
        }
        Err(e) => {
            eprintln!("Error: search failed: {e}");
            std::process::exit(1);
        }
    }
}
