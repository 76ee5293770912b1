//! Repository utility tests against standard SAP content.

use super::common::{connect, LOCAL_PACKAGE};
use abap_adt_api::RepositoryClient;

#[tokio::test]
#[ignore = "requires SAP_URL"]
async fn test_search_standard_class() {
    let repo = RepositoryClient::new(connect());
    let hits = repo
        .search("CL_ABAP_TYPEDESCR", Some("CLAS/OC"), 5)
        .await
        .expect("search should succeed");
    assert!(hits.iter().any(|h| h.name == "CL_ABAP_TYPEDESCR"));
}

#[tokio::test]
#[ignore = "requires SAP_URL"]
async fn test_where_used_standard_interface() {
    let repo = RepositoryClient::new(connect());
    let refs = repo
        .where_used("/sap/bc/adt/oo/interfaces/if_serializable_object")
        .await
        .expect("where-used should succeed");
    assert!(refs.iter().any(|r| r.is_result));
}

#[tokio::test]
#[ignore = "requires SAP_URL"]
async fn test_table_preview_to_csv() {
    let repo = RepositoryClient::new(connect());
    let data = repo
        .table_contents("T000", 5)
        .await
        .expect("data preview should succeed");
    assert!(data.column_names().any(|c| c == "MANDT"));

    let csv = data.to_csv_string().expect("csv");
    assert!(csv.starts_with("MANDT"));
}

#[tokio::test]
#[ignore = "requires SAP_URL"]
async fn test_local_package_and_inactive_objects() {
    let repo = RepositoryClient::new(connect());
    repo.package_contents(LOCAL_PACKAGE)
        .await
        .expect("package contents should succeed");
    repo.inactive_objects()
        .await
        .expect("inactive objects should succeed");
}
