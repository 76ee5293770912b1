use abap_adt_client::security::names;
use abap_adt_client::XmlNode;
use tracing::{debug, instrument};

use super::or_empty;
use crate::error::{Error, ErrorKind, Result};
use crate::types::NodeEntry;

const NODE_PATH: &str = "/sap/bc/adt/repository/nodestructure";
const PACKAGE_TYPE: &str = "DEVC/K";

impl super::RepositoryClient {
    /// Direct contents of a package.
    #[instrument(skip(self))]
    pub async fn package_contents(&self, package: &str) -> Result<Vec<NodeEntry>> {
        let package = names::normalize(package);
        if !names::is_valid_package_name(&package) {
            return Err(Error::new(ErrorKind::InvalidArgument(format!(
                "invalid package name: {package}"
            ))));
        }
        let request = self
            .conn()
            .post(NODE_PATH)
            .query("parent_type", PACKAGE_TYPE)
            .query("parent_name", package.as_str())
            .query("withShortDescriptions", "true")
            .accept("application/vnd.sap.as+xml");
        let root = or_empty(self.conn().send_xml(request).await?);
        let entries = parse_node_structure(&root);
        debug!(entries = entries.len(), "Package contents read");
        Ok(entries)
    }

    /// Contents of a package and all its sub-packages.
    pub async fn package_tree(&self, package: &str) -> Result<Vec<NodeEntry>> {
        let mut pending = vec![names::normalize(package)];
        let mut visited = Vec::new();
        let mut entries = Vec::new();
        while let Some(current) = pending.pop() {
            if visited.contains(&current) {
                continue;
            }
            for entry in self.package_contents(&current).await? {
                if entry.object_type == PACKAGE_TYPE {
                    pending.push(entry.name.clone());
                }
                entries.push(entry);
            }
            visited.push(current);
        }
        Ok(entries)
    }
}

pub(crate) fn parse_node_structure(root: &XmlNode) -> Vec<NodeEntry> {
    let field = |node: &XmlNode, name: &str| {
        node.child_text(name)
            .map(|text| text.trim().to_string())
            .unwrap_or_default()
    };
    root.find_all("SEU_ADT_REPOSITORY_OBJ_NODE")
        .into_iter()
        .map(|node| NodeEntry {
            object_type: field(node, "OBJECT_TYPE"),
            name: field(node, "OBJECT_NAME"),
            tech_name: field(node, "TECH_NAME"),
            uri: field(node, "OBJECT_URI"),
            description: field(node, "DESCRIPTION"),
            expandable: field(node, "EXPANDABLE") == "X",
        })
        .filter(|entry| !entry.name.is_empty())
        .collect()
}
