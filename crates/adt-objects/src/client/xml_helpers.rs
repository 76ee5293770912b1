//! XML building and parsing helpers shared by the verbs and object kinds.

use abap_adt_client::security::xml;
use abap_adt_client::XmlNode;
use chrono::{DateTime, Utc};

use crate::error::{Error, ErrorKind, Result};
use crate::types::{ObjectMetadata, ObjectReference};

pub const ADTCORE_NS: &str = "http://www.sap.com/adt/core";
pub const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Parse a document, mapping failures to [`ErrorKind::Parse`].
pub fn parse(body: &str) -> Result<XmlNode> {
    XmlNode::parse(body).map_err(|e| Error::with_source(ErrorKind::Parse(e.to_string()), e))
}

/// Text of a field in an `asx:abap/asx:values/DATA` payload.
pub fn data_field(root: &XmlNode, field: &str) -> Option<String> {
    root.find("DATA")
        .and_then(|data| data.child_text(field))
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// ABAP boolean (`X` or `true`).
pub fn abap_bool(value: Option<&str>) -> bool {
    matches!(
        value.map(str::trim),
        Some("X") | Some("x") | Some("true") | Some("TRUE")
    )
}

/// Split `uri#start=12,4` into the URI and its line/column.
pub fn split_position(uri: &str) -> (String, Option<u32>, Option<u32>) {
    let Some((base, fragment)) = uri.split_once('#') else {
        return (uri.to_string(), None, None);
    };
    let position = fragment
        .split(['&', ';'])
        .find_map(|part| part.strip_prefix("start="));
    let (line, column) = match position {
        Some(pos) => {
            let mut parts = pos.split(',');
            (
                parts.next().and_then(|l| l.trim().parse().ok()),
                parts.next().and_then(|c| c.trim().parse().ok()),
            )
        }
        None => (None, None),
    };
    (base.to_string(), line, column)
}

fn timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value?)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Read the `adtcore` attributes of an object document.
pub fn object_metadata(uri: &str, body: &str) -> Result<ObjectMetadata> {
    let root = parse(body)?;
    let non_empty = |v: Option<&str>| v.filter(|s| !s.is_empty()).map(str::to_string);
    Ok(ObjectMetadata {
        uri: uri.to_string(),
        name: root.attr("adtcore:name").unwrap_or_default().to_string(),
        object_type: root.attr("adtcore:type").unwrap_or_default().to_string(),
        description: root
            .attr("adtcore:description")
            .unwrap_or_default()
            .to_string(),
        package: non_empty(root.child("packageRef").and_then(|p| p.attr("adtcore:name"))),
        responsible: non_empty(root.attr("adtcore:responsible")),
        master_language: non_empty(root.attr("adtcore:masterLanguage")),
        version: non_empty(root.attr("adtcore:version")),
        changed_by: non_empty(root.attr("adtcore:changedBy")),
        changed_at: timestamp(root.attr("adtcore:changedAt")),
        created_at: timestamp(root.attr("adtcore:createdAt")),
        raw: body.to_string(),
    })
}

/// Parse an `adtcore`-attributed reference element.
pub fn object_reference(node: &XmlNode) -> ObjectReference {
    ObjectReference {
        uri: node.attr("adtcore:uri").unwrap_or_default().to_string(),
        name: node.attr("adtcore:name").unwrap_or_default().to_string(),
        object_type: node.attr("adtcore:type").unwrap_or_default().to_string(),
        parent_uri: node
            .attr("adtcore:parentUri")
            .filter(|p| !p.is_empty())
            .map(str::to_string),
    }
}

/// `adtcore:objectReferences` body used by activation.
pub fn object_references<'a>(refs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let entries: String = refs
        .into_iter()
        .map(|(uri, name)| {
            format!(
                "\n  <adtcore:objectReference adtcore:uri=\"{}\" adtcore:name=\"{}\"/>",
                xml::escape(uri),
                xml::escape(name)
            )
        })
        .collect();
    format!(
        "{XML_DECL}\n<adtcore:objectReferences xmlns:adtcore=\"{ADTCORE_NS}\">{entries}\n</adtcore:objectReferences>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_position() {
        assert_eq!(
            split_position("/sap/bc/adt/oo/classes/zcl_x/source/main#start=12,4"),
            (
                "/sap/bc/adt/oo/classes/zcl_x/source/main".to_string(),
                Some(12),
                Some(4)
            )
        );
        assert_eq!(
            split_position("/x#type=CLAS;start=3"),
            ("/x".to_string(), Some(3), None)
        );
        assert_eq!(split_position("/x"), ("/x".to_string(), None, None));
    }

    #[test]
    fn test_abap_bool() {
        assert!(abap_bool(Some("X")));
        assert!(abap_bool(Some("true")));
        assert!(!abap_bool(Some("")));
        assert!(!abap_bool(None));
    }

    #[test]
    fn test_object_metadata() {
        let body = r#"<class:abapClass xmlns:class="http://www.sap.com/adt/oo/classes" xmlns:adtcore="http://www.sap.com/adt/core"
            adtcore:name="ZCL_DEMO" adtcore:type="CLAS/OC" adtcore:description="Demo class"
            adtcore:responsible="DEVELOPER" adtcore:masterLanguage="EN" adtcore:version="active"
            adtcore:changedAt="2024-03-01T10:15:00Z" adtcore:changedBy="DEVELOPER">
            <adtcore:packageRef adtcore:name="ZDEMO" adtcore:type="DEVC/K"/>
          </class:abapClass>"#;
        let meta = object_metadata("/sap/bc/adt/oo/classes/zcl_demo", body).unwrap();
        assert_eq!(meta.name, "ZCL_DEMO");
        assert_eq!(meta.object_type, "CLAS/OC");
        assert_eq!(meta.description, "Demo class");
        assert_eq!(meta.package.as_deref(), Some("ZDEMO"));
        assert_eq!(meta.version.as_deref(), Some("active"));
        assert!(meta.changed_at.is_some());
        assert!(meta.created_at.is_none());
    }

    #[test]
    fn test_object_references_body() {
        let body = object_references([("/sap/bc/adt/oo/classes/zcl_a", "ZCL_A")]);
        let root = parse(&body).unwrap();
        assert_eq!(root.name, "adtcore:objectReferences");
        let reference = root.child("objectReference").unwrap();
        assert_eq!(reference.attr("adtcore:uri"), Some("/sap/bc/adt/oo/classes/zcl_a"));
        assert_eq!(reference.attr("adtcore:name"), Some("ZCL_A"));
    }

    #[test]
    fn test_data_field() {
        let root = parse("<asx:abap><asx:values><DATA><SEVERITY> OK </SEVERITY><SHORT_TEXT/></DATA></asx:values></asx:abap>").unwrap();
        assert_eq!(data_field(&root, "SEVERITY").as_deref(), Some("OK"));
        assert_eq!(data_field(&root, "SHORT_TEXT"), None);
    }
}
