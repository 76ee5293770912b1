use abap_adt_client::XmlNode;
use tracing::{debug, instrument};

use super::{non_empty, or_empty};
use crate::error::Result;
use crate::types::UsageReference;

const USAGE_PATH: &str = "/sap/bc/adt/repository/informationsystem/usageReferences";
const REQUEST_TYPE: &str = "application/vnd.sap.adt.repository.usagereferences.request.v1+xml";
const RESULT_TYPE: &str = "application/vnd.sap.adt.repository.usagereferences.result.v1+xml";

const REQUEST_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<usagereferences:usageReferenceRequest xmlns:usagereferences="http://www.sap.com/adt/ris/usageReferences">
  <usagereferences:affectedObjects/>
</usagereferences:usageReferenceRequest>"#;

impl super::RepositoryClient {
    /// Objects referencing `uri`, including the package nodes that group them.
    #[instrument(skip(self))]
    pub async fn where_used(&self, uri: &str) -> Result<Vec<UsageReference>> {
        let request = self
            .conn()
            .post(USAGE_PATH)
            .query("uri", uri)
            .accept(RESULT_TYPE)
            .xml(REQUEST_TYPE, REQUEST_BODY)
            .long_running();
        let root = or_empty(self.conn().send_xml(request).await?);
        let references = parse_usage_references(&root);
        debug!(
            results = references.iter().filter(|r| r.is_result).count(),
            "Where-used finished"
        );
        Ok(references)
    }
}

pub(crate) fn parse_usage_references(root: &XmlNode) -> Vec<UsageReference> {
    root.find_all("referencedObject")
        .into_iter()
        .filter_map(|node| {
            let object = node.child("adtObject");
            Some(UsageReference {
                uri: node.attr("uri")?.to_string(),
                object_type: object_attr(object, "adtcore:type").unwrap_or_default().to_string(),
                name: object_attr(object, "adtcore:name").unwrap_or_default().to_string(),
                description: non_empty(object_attr(object, "adtcore:description")),
                package: non_empty(
                    object
                        .and_then(|o| o.child("packageRef"))
                        .and_then(|p| p.attr("adtcore:name")),
                ),
                parent_uri: non_empty(node.attr("parentUri")),
                is_result: node.attr("isResult") == Some("true"),
                usage_information: non_empty(node.attr("usageInformation")),
            })
        })
        .collect()
}

fn object_attr<'a>(object: Option<&'a XmlNode>, name: &str) -> Option<&'a str> {
    object.and_then(|o| o.attr(name))
}
