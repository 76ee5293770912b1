//! Transport requests (CTS).

use abap_adt_client::security::{names, url, xml};
use abap_adt_client::XmlNode;
use serde::Serialize;
use tracing::{debug, instrument};

use super::xml_helpers::{data_field, parse};
use crate::error::{Error, ErrorKind, Result};
use crate::object_kind::ObjectRef;

const TRANSPORT_PATH: &str = "/sap/bc/adt/cts/transportrequests";
const TRANSPORT_CHECK_PATH: &str = "/sap/bc/adt/cts/transportchecks";
const TM_NS: &str = "http://www.sap.com/cts/adt/tm";
const TRANSPORT_CONTENT_TYPE: &str = "application/vnd.sap.adt.transportorganizer.v1+xml";
const TRANSPORT_CHECK_CONTENT_TYPE: &str =
    "application/vnd.sap.as+xml; charset=UTF-8; dataname=com.sap.adt.transport.service.checkData";

/// A transport request with its tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransportRequest {
    pub number: String,
    pub owner: String,
    pub description: String,
    /// `D` modifiable, `R` released.
    pub status: String,
    /// `K` workbench, `W` customizing.
    pub request_type: String,
    pub target: Option<String>,
    pub tasks: Vec<TransportTask>,
    /// Objects recorded directly on the request.
    pub objects: Vec<TransportObject>,
}

/// A task below a transport request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransportTask {
    pub number: String,
    pub owner: String,
    pub description: String,
    pub status: String,
    pub objects: Vec<TransportObject>,
}

/// An object entry (`R3TR CLAS ZCL_X`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransportObject {
    pub pgmid: String,
    pub object_type: String,
    pub name: String,
    pub description: Option<String>,
}

/// A request offered by the transport check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransportHeader {
    pub number: String,
    pub owner: String,
    pub text: String,
}

/// Answer of the transport check for one object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransportCheck {
    /// `S` when the check passed.
    pub result: String,
    /// Object is recorded in transports (`X`).
    pub recording: bool,
    pub delivery_unit: Option<String>,
    pub package: Option<String>,
    /// Open requests the object can be recorded on.
    pub transports: Vec<TransportHeader>,
    /// Request the object is already locked in, if any.
    pub locked_in: Option<String>,
}

impl TransportCheck {
    /// True when no transport is needed (local package).
    pub fn is_local(&self) -> bool {
        !self.recording
    }
}

impl super::ObjectClient {
    /// Create a workbench request and return its number.
    #[instrument(skip(self, description))]
    pub async fn create_transport(
        &self,
        description: &str,
        owner: &str,
        target: Option<&str>,
    ) -> Result<String> {
        let request = self
            .conn
            .post(TRANSPORT_PATH)
            .accept("text/plain")
            .xml(
                TRANSPORT_CONTENT_TYPE,
                create_transport_body(description, owner, target),
            );
        let body = self.conn.send_text(request).await?;
        let number = parse_created_transport(&body)?;
        debug!(%number, "Transport request created");
        Ok(number)
    }

    /// Read a transport request with its tasks and objects.
    #[instrument(skip(self))]
    pub async fn read_transport(&self, number: &str) -> Result<TransportRequest> {
        let number = names::normalize(number);
        if !names::is_valid_transport(&number) {
            return Err(Error::new(ErrorKind::InvalidConfig(format!(
                "invalid transport number '{number}'"
            ))));
        }
        let request = self
            .conn
            .get(&format!("{TRANSPORT_PATH}/{}", url::encode_param(&number)))
            .accept(TRANSPORT_CONTENT_TYPE);
        let body = self.conn.send_text(request).await?;
        parse_transport(&body, &number)
    }

    /// Ask which requests an object change may be recorded on.
    #[instrument(skip(self), fields(uri = %object.uri))]
    pub async fn transport_check(&self, object: &ObjectRef, package: &str) -> Result<TransportCheck> {
        let request = self
            .conn
            .post(TRANSPORT_CHECK_PATH)
            .accept(TRANSPORT_CHECK_CONTENT_TYPE)
            .xml(
                TRANSPORT_CHECK_CONTENT_TYPE,
                transport_check_body(object, package),
            );
        let body = self.conn.send_text(request).await?;
        parse_transport_check(&body)
    }
}

pub(crate) fn create_transport_body(description: &str, owner: &str, target: Option<&str>) -> String {
    format!(
        r#"<?xml version="1.0" encoding="ASCII"?>
<tm:root xmlns:tm="{TM_NS}" tm:useraction="newrequest">
  <tm:request tm:desc="{}" tm:type="K" tm:target="{}" tm:cts_project="">
    <tm:task tm:owner="{}"/>
  </tm:request>
</tm:root>"#,
        xml::escape(description),
        xml::escape(target.unwrap_or("LOCAL")),
        xml::escape(&names::normalize(owner))
    )
}

/// The backend answers with a record URI (`/com.sap.cts/object_record/DEVK900123`)
/// or with the request XML.
pub(crate) fn parse_created_transport(body: &str) -> Result<String> {
    let trimmed = body.trim();
    let number = if trimmed.starts_with('<') {
        parse(trimmed)?
            .find("request")
            .and_then(|r| r.attr("tm:number"))
            .map(str::to_string)
    } else {
        trimmed
            .rsplit('/')
            .next()
            .filter(|n| !n.is_empty())
            .map(str::to_string)
    };
    number.ok_or_else(|| {
        Error::new(ErrorKind::Parse(
            "transport creation returned no request number".to_string(),
        ))
    })
}

pub(crate) fn parse_transport(body: &str, number: &str) -> Result<TransportRequest> {
    let root = parse(body)?;
    let request = root
        .find_all("tm:request")
        .into_iter()
        .find(|r| r.attr("tm:number") == Some(number))
        .or_else(|| root.find("tm:request"))
        .ok_or_else(|| Error::new(ErrorKind::Parse(format!("transport {number} not in response"))))?;

    let attr = |node: &XmlNode, name: &str| node.attr(name).unwrap_or_default().to_string();
    let tasks = request
        .children_named("tm:task")
        .map(|task| TransportTask {
            number: attr(task, "tm:number"),
            owner: attr(task, "tm:owner"),
            description: attr(task, "tm:desc"),
            status: attr(task, "tm:status"),
            objects: objects_of(task),
        })
        .collect();

    Ok(TransportRequest {
        number: attr(request, "tm:number"),
        owner: attr(request, "tm:owner"),
        description: attr(request, "tm:desc"),
        status: attr(request, "tm:status"),
        request_type: attr(request, "tm:type"),
        target: request
            .attr("tm:target")
            .filter(|t| !t.is_empty())
            .map(str::to_string),
        tasks,
        objects: objects_of(request),
    })
}

fn objects_of(node: &XmlNode) -> Vec<TransportObject> {
    node.children_named("tm:abap_object")
        .map(|o| TransportObject {
            pgmid: o.attr("tm:pgmid").unwrap_or_default().to_string(),
            object_type: o.attr("tm:type").unwrap_or_default().to_string(),
            name: o.attr("tm:name").unwrap_or_default().to_string(),
            description: o
                .attr("tm:obj_desc")
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        })
        .collect()
}

pub(crate) fn transport_check_body(object: &ObjectRef, package: &str) -> String {
    let object_type = object
        .kind
        .adt_type()
        .split('/')
        .next()
        .unwrap_or_default();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<asx:abap xmlns:asx="http://www.sap.com/abapxml" version="1.0">
  <asx:values>
    <DATA>
      <PGMID/>
      <OBJECT>{}</OBJECT>
      <OBJECTNAME>{}</OBJECTNAME>
      <DEVCLASS>{}</DEVCLASS>
      <OPERATION>I</OPERATION>
      <URI>{}</URI>
    </DATA>
  </asx:values>
</asx:abap>"#,
        object_type,
        xml::escape(&object.name),
        xml::escape(&names::normalize(package)),
        xml::escape(&object.uri)
    )
}

pub(crate) fn parse_transport_check(body: &str) -> Result<TransportCheck> {
    let root = parse(body)?;
    let transports = root
        .find("TRANSPORTS")
        .map(|list| {
            list.children
                .iter()
                .map(|header| TransportHeader {
                    number: header.child_text("TRKORR").unwrap_or_default().trim().to_string(),
                    owner: header.child_text("AS4USER").unwrap_or_default().trim().to_string(),
                    text: header.child_text("AS4TEXT").unwrap_or_default().trim().to_string(),
                })
                .filter(|h| !h.number.is_empty())
                .collect()
        })
        .unwrap_or_default();

    Ok(TransportCheck {
        result: data_field(&root, "RESULT").unwrap_or_default(),
        recording: data_field(&root, "RECORDING").as_deref() == Some("X"),
        delivery_unit: data_field(&root, "DLVUNIT"),
        package: data_field(&root, "DEVCLASS"),
        transports,
        locked_in: root
            .find("LOCKS")
            .and_then(|locks| locks.find_text("TRKORR"))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()),
    })
}
