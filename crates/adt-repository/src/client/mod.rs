//! Repository-wide ADT queries.

use abap_adt_client::{AdtConnection, XmlNode};
use abap_adt_objects::ObjectClient;

use crate::error::{Error, ErrorKind, Result};

mod data_preview;
mod inactive;
mod node_structure;
mod readers;
mod search;
mod where_used;

/// Client for queries that span the repository rather than one object.
///
/// # Example
///
/// ```rust,ignore
/// use abap_adt_repository::RepositoryClient;
///
/// let repo = RepositoryClient::new(conn);
/// for hit in repo.search("ZCL_*", Some("CLAS/OC"), 50).await? {
///     println!("{} {}", hit.name, hit.uri);
/// }
///
/// let data = repo.table_contents("SFLIGHT", 100).await?;
/// data.write_csv(std::io::stdout())?;
/// ```
#[derive(Debug, Clone)]
pub struct RepositoryClient {
    objects: ObjectClient,
}

impl RepositoryClient {
    pub fn new(conn: AdtConnection) -> Self {
        Self {
            objects: ObjectClient::new(conn),
        }
    }

    /// Object-level verbs over the same connection.
    pub fn objects(&self) -> &ObjectClient {
        &self.objects
    }

    fn conn(&self) -> &AdtConnection {
        self.objects.connection()
    }
}

/// `None` bodies become an empty root so callers see no results.
pub(crate) fn or_empty(root: Option<XmlNode>) -> XmlNode {
    root.unwrap_or_default()
}

pub(crate) fn parse_error(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::Parse(message.into()))
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
pub(crate) mod test_support {
    use abap_adt_client::{AdtConnection, ConnectionConfig, CSRF_HEADER, DISCOVERY_PATH};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn connection(server: &MockServer) -> AdtConnection {
        Mock::given(method("GET"))
            .and(path(DISCOVERY_PATH))
            .respond_with(ResponseTemplate::new(200).insert_header(CSRF_HEADER, "TOKEN"))
            .mount(server)
            .await;
        AdtConnection::new(ConnectionConfig::basic(server.uri(), "DEVELOPER", "secret"))
            .expect("valid mock connection")
    }
}
