use abap_adt_client::XmlNode;
use tracing::{debug, instrument};

use super::xml_helpers::{object_reference, object_references, parse, split_position};
use crate::error::Result;
use crate::object_kind::ObjectRef;
use crate::types::{ActivationMessage, ActivationResult, ObjectReference, Severity};

const ACTIVATION_PATH: &str = "/sap/bc/adt/activation";

impl super::ObjectClient {
    /// Activate a single object.
    pub async fn activate(&self, object: &ObjectRef) -> Result<ActivationResult> {
        self.activate_all(std::slice::from_ref(object)).await
    }

    /// Activate several objects in one request (mass activation).
    #[instrument(skip(self, objects), fields(count = objects.len()))]
    pub async fn activate_all(&self, objects: &[ObjectRef]) -> Result<ActivationResult> {
        let body = object_references(
            objects
                .iter()
                .map(|o| (o.uri.as_str(), o.name.as_str())),
        );
        let request = self
            .conn
            .post(ACTIVATION_PATH)
            .query("method", "activate")
            .query("preauditRequested", "true")
            .xml("application/xml", body)
            .long_running();

        let response = self.conn.send_text(request).await?;
        let result = parse_activation_result(&response)?;
        debug!(
            success = result.success,
            messages = result.messages.len(),
            inactive = result.inactive.len(),
            "Activation finished"
        );
        Ok(result)
    }
}

/// Parse the activation response. An empty body means everything was
/// activated.
pub(crate) fn parse_activation_result(body: &str) -> Result<ActivationResult> {
    if body.trim().is_empty() {
        return Ok(ActivationResult {
            success: true,
            ..Default::default()
        });
    }

    let root = parse(body)?;
    let messages: Vec<ActivationMessage> =
        root.find_all("msg").into_iter().map(parse_message).collect();
    let inactive: Vec<ObjectReference> = root
        .find_all("ioc:entry")
        .into_iter()
        .filter_map(|entry| entry.find("ioc:ref"))
        .map(object_reference)
        .collect();

    let success = inactive.is_empty() && !messages.iter().any(|m| m.severity.is_error());
    Ok(ActivationResult {
        success,
        messages,
        inactive,
    })
}

fn parse_message(node: &XmlNode) -> ActivationMessage {
    let href = node
        .attr("href")
        .filter(|h| !h.is_empty())
        .map(str::to_string);
    let line = node
        .attr("line")
        .and_then(|l| l.trim().parse().ok())
        .or_else(|| href.as_deref().and_then(|h| split_position(h).1));
    let text = node
        .find("shortText")
        .and_then(|s| s.child_text("txt").or(Some(s.text())))
        .unwrap_or_default()
        .trim()
        .to_string();

    ActivationMessage {
        severity: Severity::from_code(node.attr("type").unwrap_or_default()),
        text,
        href,
        line,
        object_description: node
            .attr("objDescr")
            .filter(|d| !d.is_empty())
            .map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::connection;
    use crate::client::ObjectClient;
    use crate::object_kind::ObjectKind;
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MESSAGES: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<chkl:messages xmlns:chkl="http://www.sap.com/abapxml/checklist">
  <msg objDescr="Class ZCL_DEMO" type="E" line="1" href="/sap/bc/adt/oo/classes/zcl_demo/source/main#start=12,4" forceSupported="true">
    <shortText><txt>The method "RUN" is not declared.</txt></shortText>
  </msg>
  <msg objDescr="Class ZCL_DEMO" type="W" line="0" href="">
    <shortText><txt>Unused variable.</txt></shortText>
  </msg>
</chkl:messages>"#;

    const INACTIVE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<ioc:inactiveObjects xmlns:ioc="http://www.sap.com/abapxml/inactiveCtsObjects" xmlns:adtcore="http://www.sap.com/adt/core">
  <ioc:entry>
    <ioc:object ioc:user="DEVELOPER" ioc:deleted="false">
      <ioc:ref adtcore:uri="/sap/bc/adt/oo/classes/zcl_demo" adtcore:type="CLAS/OC" adtcore:name="ZCL_DEMO"/>
    </ioc:object>
    <ioc:transport/>
  </ioc:entry>
</ioc:inactiveObjects>"#;

    #[test]
    fn test_empty_body_is_success() {
        let result = parse_activation_result("").unwrap();
        assert!(result.success);
        assert!(result.messages.is_empty());
    }

    #[test]
    fn test_parse_error_messages() {
        let result = parse_activation_result(MESSAGES).unwrap();
        assert!(!result.success);
        assert_eq!(result.messages.len(), 2);
        let error = &result.messages[0];
        assert_eq!(error.severity, Severity::Error);
        assert_eq!(error.text, "The method \"RUN\" is not declared.");
        assert_eq!(error.line, Some(1));
        assert_eq!(error.object_description.as_deref(), Some("Class ZCL_DEMO"));
        assert_eq!(result.messages[1].href, None);
        assert_eq!(result.errors().len(), 1);
    }

    #[test]
    fn test_warnings_only_is_success() {
        let body = r#"<chkl:messages xmlns:chkl="http://www.sap.com/abapxml/checklist">
            <msg type="W"><shortText><txt>Unused variable.</txt></shortText></msg>
        </chkl:messages>"#;
        let result = parse_activation_result(body).unwrap();
        assert!(result.success);
        assert!(result.errors().is_empty());
    }

    #[test]
    fn test_inactive_objects_mean_failure() {
        let result = parse_activation_result(INACTIVE).unwrap();
        assert!(!result.success);
        assert_eq!(result.inactive.len(), 1);
        assert_eq!(result.inactive[0].name, "ZCL_DEMO");
        assert_eq!(result.inactive[0].object_type, "CLAS/OC");
    }

    #[tokio::test]
    async fn test_activate_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ACTIVATION_PATH))
            .and(query_param("method", "activate"))
            .and(query_param("preauditRequested", "true"))
            .and(body_string_contains(
                r#"adtcore:uri="/sap/bc/adt/oo/classes/zcl_demo" adtcore:name="ZCL_DEMO""#,
            ))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = ObjectClient::new(connection(&server).await);
        let object = ObjectRef::new(ObjectKind::Class, "ZCL_DEMO").unwrap();
        assert!(client.activate(&object).await.unwrap().success);
    }
}
