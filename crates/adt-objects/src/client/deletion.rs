use abap_adt_client::security::xml;
use abap_adt_client::XmlNode;
use tracing::{debug, instrument};

use super::xml_helpers::{abap_bool, parse, ADTCORE_NS, XML_DECL};
use crate::error::{Error, ErrorKind, Result};
use crate::object_kind::ObjectRef;
use crate::types::DeletionCheck;

const DELETION_NS: &str = "http://www.sap.com/adt/deletion";
const DELETE_PATH: &str = "/sap/bc/adt/deletion/delete";
const DELETE_CHECK_PATH: &str = "/sap/bc/adt/deletion/check";
const DELETE_CONTENT_TYPE: &str = "application/vnd.sap.adt.deletion.request.v1+xml";
const DELETE_CHECK_CONTENT_TYPE: &str = "application/vnd.sap.adt.deletion.check.request.v1+xml";

impl super::ObjectClient {
    /// Delete one or more objects, recording the deletion on `transport`.
    #[instrument(skip(self, objects), fields(count = objects.len()))]
    pub async fn delete(&self, objects: &[ObjectRef], transport: Option<&str>) -> Result<()> {
        if objects.is_empty() {
            return Ok(());
        }
        let request = self
            .conn
            .post(DELETE_PATH)
            .xml(DELETE_CONTENT_TYPE, deletion_request_body(objects, transport));
        self.conn.send(request).await?;
        debug!("Objects deleted");
        Ok(())
    }

    /// Ask whether objects can be deleted.
    #[instrument(skip(self, objects), fields(count = objects.len()))]
    pub async fn check_deletion(&self, objects: &[ObjectRef]) -> Result<Vec<DeletionCheck>> {
        if objects.is_empty() {
            return Ok(Vec::new());
        }
        let request = self
            .conn
            .post(DELETE_CHECK_PATH)
            .xml(DELETE_CHECK_CONTENT_TYPE, deletion_check_body(objects));
        let body = self.conn.send_text(request).await?;
        parse_deletion_check(&body, objects)
    }
}

pub(crate) fn deletion_request_body(objects: &[ObjectRef], transport: Option<&str>) -> String {
    let transport = xml::escape(transport.unwrap_or_default());
    let entries: String = objects
        .iter()
        .map(|object| {
            format!(
                "\n  <del:object adtcore:uri=\"{}\">\n    <del:transportNumber>{transport}</del:transportNumber>\n  </del:object>",
                xml::escape(&object.uri)
            )
        })
        .collect();
    format!(
        "{XML_DECL}\n<del:deletionRequest xmlns:del=\"{DELETION_NS}\" xmlns:adtcore=\"{ADTCORE_NS}\">{entries}\n</del:deletionRequest>"
    )
}

pub(crate) fn deletion_check_body(objects: &[ObjectRef]) -> String {
    let entries: String = objects
        .iter()
        .map(|object| format!("\n  <del:object adtcore:uri=\"{}\"/>", xml::escape(&object.uri)))
        .collect();
    format!(
        "{XML_DECL}\n<del:checkRequest xmlns:del=\"{DELETION_NS}\" xmlns:adtcore=\"{ADTCORE_NS}\">{entries}\n</del:checkRequest>"
    )
}

/// Objects missing from the answer are reported deletable; an explicit
/// `isDeletable="false"` or an error-typed message marks them blocked.
pub(crate) fn parse_deletion_check(body: &str, objects: &[ObjectRef]) -> Result<Vec<DeletionCheck>> {
    let entries: Vec<DeletionCheck> = if body.trim().is_empty() {
        Vec::new()
    } else {
        let root = parse(body)?;
        root.find_all("object")
            .into_iter()
            .filter(|node| node.attr("adtcore:uri").is_some())
            .map(parse_check_entry)
            .collect()
    };

    Ok(objects
        .iter()
        .map(|object| {
            entries
                .iter()
                .find(|entry| entry.uri == object.uri)
                .cloned()
                .unwrap_or_else(|| DeletionCheck {
                    uri: object.uri.clone(),
                    deletable: true,
                    message: None,
                })
        })
        .collect())
}

fn parse_check_entry(node: &XmlNode) -> DeletionCheck {
    let message_node = node.find("message");
    let message = message_node
        .map(|m| {
            m.attr("shortText")
                .or_else(|| m.child_text("shortText"))
                .unwrap_or(m.text())
                .trim()
                .to_string()
        })
        .filter(|m| !m.is_empty());
    let message_is_error = message_node
        .and_then(|m| m.attr("type"))
        .is_some_and(|t| t.eq_ignore_ascii_case("E"));
    let flag = node.attr("isDeletable").or_else(|| node.attr("deletable"));

    DeletionCheck {
        uri: node.attr("adtcore:uri").unwrap_or_default().to_string(),
        deletable: flag.map(|f| abap_bool(Some(f))).unwrap_or(true) && !message_is_error,
        message,
    }
}

/// Error for a deletion check that blocks the delete.
pub(crate) fn not_deletable(check: &DeletionCheck) -> Error {
    Error::new(ErrorKind::Other(format!(
        "{} cannot be deleted{}",
        check.uri,
        check
            .message
            .as_deref()
            .map(|m| format!(": {m}"))
            .unwrap_or_default()
    )))
}
