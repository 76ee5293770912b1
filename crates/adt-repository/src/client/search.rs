use abap_adt_client::XmlNode;
use tracing::{debug, instrument};

use super::{non_empty, or_empty};
use crate::error::{Error, ErrorKind, Result};
use crate::types::SearchResult;

const SEARCH_PATH: &str = "/sap/bc/adt/repository/informationsystem/search";

impl super::RepositoryClient {
    /// Quick search by name pattern (`*` wildcards), optionally for one ADT type.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        query: &str,
        object_type: Option<&str>,
        max_results: u32,
    ) -> Result<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Err(Error::new(ErrorKind::InvalidArgument(
                "search query is empty".to_string(),
            )));
        }
        let request = self
            .conn()
            .get(SEARCH_PATH)
            .query("operation", "quickSearch")
            .query("query", query.trim())
            .query("maxResults", max_results.max(1).to_string())
            .query_opt("objectType", object_type)
            .accept("application/xml");
        let root = or_empty(self.conn().send_xml(request).await?);
        let results = parse_search_results(&root);
        debug!(hits = results.len(), "Search finished");
        Ok(results)
    }
}

pub(crate) fn parse_search_results(root: &XmlNode) -> Vec<SearchResult> {
    root.find_all("objectReference")
        .into_iter()
        .filter_map(|node| {
            Some(SearchResult {
                uri: node.attr("adtcore:uri")?.to_string(),
                object_type: node.attr("adtcore:type").unwrap_or_default().to_string(),
                name: node.attr("adtcore:name").unwrap_or_default().to_string(),
                package: non_empty(node.attr("adtcore:packageName")),
                description: non_empty(node.attr("adtcore:description")),
            })
        })
        .collect()
}
