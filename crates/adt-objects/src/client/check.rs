use abap_adt_client::security::xml;
use abap_adt_client::XmlNode;
use base64::Engine;
use tracing::{debug, instrument};

use super::xml_helpers::{parse, split_position, ADTCORE_NS, XML_DECL};
use crate::error::Result;
use crate::types::{CheckMessage, CheckReport, CheckRunReport, Severity, Version};

const CHECKRUN_NS: &str = "http://www.sap.com/adt/checkrun";
const CHECK_PATH: &str = "/sap/bc/adt/checkruns";
const CHECK_CONTENT_TYPE: &str = "application/vnd.sap.adt.checkobjects+xml";
const CHECK_ACCEPT: &str = "application/vnd.sap.adt.checkmessages+xml";

/// One object of a check run.
#[derive(Debug, Clone)]
pub struct CheckObject {
    pub uri: String,
    pub version: Version,
    /// Unsaved content to check instead of the stored source, as
    /// `(source uri, text)`.
    pub content: Option<(String, String)>,
}

impl CheckObject {
    /// Check the stored version of an object.
    pub fn stored(uri: impl Into<String>, version: Version) -> Self {
        Self {
            uri: uri.into(),
            version,
            content: None,
        }
    }

    /// Check proposed source text before it is written.
    pub fn with_content(
        uri: impl Into<String>,
        source_uri: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            version: Version::Inactive,
            content: Some((source_uri.into(), content.into())),
        }
    }
}

impl super::ObjectClient {
    /// Run the ABAP check reporter on one or more objects.
    #[instrument(skip(self, objects), fields(count = objects.len()))]
    pub async fn check(&self, objects: &[CheckObject]) -> Result<CheckReport> {
        let request = self
            .conn
            .post(CHECK_PATH)
            .query("reporters", "abapCheckRun")
            .accept(CHECK_ACCEPT)
            .xml(CHECK_CONTENT_TYPE, check_request_body(objects));

        let body = self.conn.send_text(request).await?;
        let report = parse_check_report(&body)?;
        debug!(
            messages = report.messages().count(),
            errors = report.errors().len(),
            "Check run finished"
        );
        Ok(report)
    }
}

pub(crate) fn check_request_body(objects: &[CheckObject]) -> String {
    let mut out = format!(
        "{XML_DECL}\n<chkrun:checkObjectList xmlns:chkrun=\"{CHECKRUN_NS}\" xmlns:adtcore=\"{ADTCORE_NS}\">"
    );
    for object in objects {
        out.push_str(&format!(
            "\n  <chkrun:checkObject adtcore:uri=\"{}\" chkrun:version=\"{}\">",
            xml::escape(&object.uri),
            object.version.as_str()
        ));
        if let Some((source_uri, content)) = &object.content {
            let encoded = base64::engine::general_purpose::STANDARD.encode(content);
            out.push_str(&format!(
                "\n    <chkrun:artifacts>\n      <chkrun:artifact chkrun:contentType=\"text/plain; charset=utf-8\" chkrun:uri=\"{}\">\n        <chkrun:content>{encoded}</chkrun:content>\n      </chkrun:artifact>\n    </chkrun:artifacts>",
                xml::escape(source_uri)
            ));
        }
        out.push_str("\n  </chkrun:checkObject>");
    }
    out.push_str("\n</chkrun:checkObjectList>");
    out
}

pub(crate) fn parse_check_report(body: &str) -> Result<CheckReport> {
    if body.trim().is_empty() {
        return Ok(CheckReport::default());
    }
    let root = parse(body)?;
    let reports = root
        .find_all("checkReport")
        .into_iter()
        .map(parse_run_report)
        .collect();
    Ok(CheckReport { reports })
}

fn parse_run_report(node: &XmlNode) -> CheckRunReport {
    let attr = |name: &str| node.attr(name).unwrap_or_default().to_string();
    CheckRunReport {
        reporter: attr("chkrun:reporter"),
        triggering_uri: attr("chkrun:triggeringUri"),
        status: attr("chkrun:status"),
        status_text: attr("chkrun:statusText"),
        messages: node
            .find_all("checkMessage")
            .into_iter()
            .map(parse_message)
            .collect(),
    }
}

fn parse_message(node: &XmlNode) -> CheckMessage {
    let (uri, line, column) = split_position(node.attr("chkrun:uri").unwrap_or_default());
    CheckMessage {
        uri,
        line,
        column,
        severity: Severity::from_code(node.attr("chkrun:type").unwrap_or_default()),
        text: node
            .attr("chkrun:shortText")
            .unwrap_or_default()
            .to_string(),
        category: node
            .attr("chkrun:category")
            .filter(|c| !c.is_empty())
            .map(str::to_string),
    }
}
