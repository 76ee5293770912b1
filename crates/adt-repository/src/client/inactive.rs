use abap_adt_client::XmlNode;
use tracing::{debug, instrument};

use super::{non_empty, or_empty};
use crate::error::Result;
use crate::types::InactiveObject;

const INACTIVE_PATH: &str = "/sap/bc/adt/activation/inactiveobjects";
const INACTIVE_TYPE: &str = "application/vnd.sap.adt.inactivectsobjects.v1+xml";

impl super::RepositoryClient {
    /// Objects of all users that have an inactive version.
    #[instrument(skip(self))]
    pub async fn inactive_objects(&self) -> Result<Vec<InactiveObject>> {
        let request = self
            .conn()
            .get(INACTIVE_PATH)
            .accept(format!("{INACTIVE_TYPE}, application/xml;q=0.8"));
        let root = or_empty(self.conn().send_xml(request).await?);
        let objects = parse_inactive_objects(&root);
        debug!(count = objects.len(), "Inactive objects read");
        Ok(objects)
    }
}

pub(crate) fn parse_inactive_objects(root: &XmlNode) -> Vec<InactiveObject> {
    root.find_all("ioc:entry")
        .into_iter()
        .filter_map(|entry| {
            let object = entry.child("ioc:object")?;
            let reference = object.child("ioc:ref")?;
            let transport = entry
                .child("ioc:transport")
                .and_then(|t| t.child("ioc:ref"))
                .and_then(|r| non_empty(r.attr("adtcore:name")));
            Some(InactiveObject {
                uri: reference.attr("adtcore:uri")?.to_string(),
                object_type: reference.attr("adtcore:type").unwrap_or_default().to_string(),
                name: reference.attr("adtcore:name").unwrap_or_default().to_string(),
                parent_uri: non_empty(reference.attr("adtcore:parentUri")),
                user: non_empty(object.attr("ioc:user")),
                deleted: object.attr("ioc:deleted") == Some("true"),
                transport,
            })
        })
        .collect()
}
