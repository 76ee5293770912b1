//! Data elements (`DTEL/DE`).
//!
//! A data element has no source; its whole definition is the
//! `dtel:dataElement` block, which is written again on every update.

use super::{document, element, flag, invalid, upper, Adt, ObjectConfig, ObjectHeader, ObjectSpec};
use crate::error::Result;
use crate::object_kind::ObjectKind;

pub type AdtDataElement = Adt<DataElementSpec>;

const DTEL_NS: &str = "http://www.sap.com/adt/dictionary/dataelements";
const WBOBJ_NS: &str = "http://www.sap.com/wbobj/dictionary/dtel";

/// Maximum lengths of the short, medium, long and heading labels.
pub const LABEL_MAX_LENGTHS: [usize; 4] = [10, 20, 40, 55];

/// What the data element is typed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataElementType {
    /// Typed by a domain.
    Domain(String),
    /// Built-in type such as `CHAR 10` or `DEC 15,2`.
    Predefined {
        data_type: String,
        length: u32,
        decimals: u32,
    },
    /// `REF TO` a built-in type.
    RefToPredefined {
        data_type: String,
        length: u32,
        decimals: u32,
    },
    /// `REF TO` a dictionary type.
    RefToDictionaryType(String),
    /// `REF TO` a class or interface.
    RefToClass(String),
}

impl DataElementType {
    pub fn predefined(data_type: impl Into<String>, length: u32, decimals: u32) -> Self {
        DataElementType::Predefined {
            data_type: upper(data_type),
            length,
            decimals,
        }
    }

    pub fn domain(name: impl Into<String>) -> Self {
        DataElementType::Domain(upper(name))
    }

    /// Value of `dtel:typeKind`.
    pub fn kind(&self) -> &'static str {
        match self {
            DataElementType::Domain(_) => "domain",
            DataElementType::Predefined { .. } => "predefinedAbapType",
            DataElementType::RefToPredefined { .. } => "refToPredefinedAbapType",
            DataElementType::RefToDictionaryType(_) => "refToDictionaryType",
            DataElementType::RefToClass(_) => "refToClifType",
        }
    }

    fn type_name(&self) -> &str {
        match self {
            DataElementType::Domain(name)
            | DataElementType::RefToDictionaryType(name)
            | DataElementType::RefToClass(name) => name,
            _ => "",
        }
    }

    fn builtin(&self) -> (&str, u32, u32) {
        match self {
            DataElementType::Predefined {
                data_type,
                length,
                decimals,
            }
            | DataElementType::RefToPredefined {
                data_type,
                length,
                decimals,
            } => (data_type, *length, *decimals),
            _ => ("", 0, 0),
        }
    }
}

/// Short, medium, long and heading field labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldLabels {
    pub short: String,
    pub medium: String,
    pub long: String,
    pub heading: String,
}

impl FieldLabels {
    /// Use one text for all four labels, cut to each maximum.
    pub fn uniform(text: &str) -> Self {
        Self {
            short: text.to_string(),
            medium: text.to_string(),
            long: text.to_string(),
            heading: text.to_string(),
        }
        .truncated()
    }

    /// Labels cut to their maximum lengths.
    pub fn truncated(&self) -> Self {
        let [short, medium, long, heading] = LABEL_MAX_LENGTHS;
        Self {
            short: truncate(&self.short, short),
            medium: truncate(&self.medium, medium),
            long: truncate(&self.long, long),
            heading: truncate(&self.heading, heading),
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataElementConfig {
    pub header: ObjectHeader,
    pub data_type: DataElementType,
    pub labels: FieldLabels,
    pub search_help: Option<String>,
    pub search_help_parameter: Option<String>,
    /// SET/GET parameter id.
    pub parameter_id: Option<String>,
    pub default_component_name: Option<String>,
    pub change_document: bool,
    pub deactivate_input_history: bool,
}

impl DataElementConfig {
    pub fn new(header: ObjectHeader, data_type: DataElementType) -> Self {
        let labels = FieldLabels::uniform(&header.description);
        Self {
            header,
            data_type,
            labels,
            search_help: None,
            search_help_parameter: None,
            parameter_id: None,
            default_component_name: None,
            change_document: false,
            deactivate_input_history: false,
        }
    }

    pub fn with_labels(mut self, labels: FieldLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_search_help(mut self, search_help: impl Into<String>, parameter: impl Into<String>) -> Self {
        self.search_help = Some(upper(search_help));
        self.search_help_parameter = Some(upper(parameter));
        self
    }

    pub fn with_parameter_id(mut self, parameter_id: impl Into<String>) -> Self {
        self.parameter_id = Some(upper(parameter_id));
        self
    }

    pub fn with_change_document(mut self, enabled: bool) -> Self {
        self.change_document = enabled;
        self
    }
}

impl ObjectConfig for DataElementConfig {
    fn header(&self) -> &ObjectHeader {
        &self.header
    }

    fn validate(&self) -> Result<()> {
        self.header.validate()?;
        match &self.data_type {
            DataElementType::Domain(name)
            | DataElementType::RefToDictionaryType(name)
            | DataElementType::RefToClass(name)
                if name.trim().is_empty() =>
            {
                Err(invalid("data element type name is required"))
            }
            DataElementType::Predefined { data_type, .. }
            | DataElementType::RefToPredefined { data_type, .. }
                if data_type.trim().is_empty() =>
            {
                Err(invalid("data element built-in type is required"))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DataElementSpec;

impl ObjectSpec for DataElementSpec {
    type Config = DataElementConfig;

    fn kind(&self) -> ObjectKind {
        ObjectKind::DataElement
    }

    fn create_body(&self, config: &DataElementConfig) -> Result<String> {
        Ok(document(
            "blue:wbobj",
            &format!("xmlns:blue=\"{WBOBJ_NS}\""),
            &config.header,
            ObjectKind::DataElement,
            "",
            &data_element_block(config),
        ))
    }
}

fn data_element_block(config: &DataElementConfig) -> String {
    let (data_type, length, decimals) = config.data_type.builtin();
    let labels = config.labels.truncated();
    let opt = |value: &Option<String>| value.clone().unwrap_or_default();

    let mut fields = vec![
        element("dtel:typeKind", config.data_type.kind()),
        element("dtel:typeName", config.data_type.type_name()),
        element("dtel:dataType", data_type),
        element("dtel:dataTypeLength", &length.to_string()),
        element("dtel:dataTypeDecimals", &decimals.to_string()),
    ];
    let [short_max, medium_max, long_max, heading_max] = LABEL_MAX_LENGTHS;
    for (name, text, max) in [
        ("short", &labels.short, short_max),
        ("medium", &labels.medium, medium_max),
        ("long", &labels.long, long_max),
        ("heading", &labels.heading, heading_max),
    ] {
        fields.push(element(&format!("dtel:{name}FieldLabel"), text));
        fields.push(element(&format!("dtel:{name}FieldLength"), &max.to_string()));
        fields.push(element(&format!("dtel:{name}FieldMaxLength"), &max.to_string()));
    }
    fields.extend([
        element("dtel:searchHelp", &opt(&config.search_help)),
        element("dtel:searchHelpParameter", &opt(&config.search_help_parameter)),
        element("dtel:setGetParameter", &opt(&config.parameter_id)),
        element("dtel:defaultComponentName", &opt(&config.default_component_name)),
        element("dtel:deactivateInputHistory", flag(config.deactivate_input_history)),
        element("dtel:changeDocument", flag(config.change_document)),
        element("dtel:leftToRightDirection", "false"),
        element("dtel:deactivateBIDIFiltering", "false"),
    ]);

    let body: String = fields.iter().map(|f| format!("\n    {f}")).collect();
    format!("\n  <dtel:dataElement xmlns:dtel=\"{DTEL_NS}\">{body}\n  </dtel:dataElement>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::{connection, LOCK_RESPONSE};
    use crate::client::xml_helpers::parse;
    use crate::error::ErrorKind;
    use crate::types::UpdateOptions;
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config() -> DataElementConfig {
        DataElementConfig::new(
            ObjectHeader::new("ZDTEL_AMOUNT", "ZDEMO", "Invoice amount in document currency"),
            DataElementType::predefined("curr", 15, 2),
        )
    }

    #[test]
    fn test_labels_truncated() {
        let labels = FieldLabels::uniform("Invoice amount in document currency for posting");
        assert_eq!(labels.short, "Invoice am");
        assert_eq!(labels.medium.chars().count(), 20);
        assert_eq!(labels.long.chars().count(), 40);
        assert_eq!(labels.heading, "Invoice amount in document currency for posting");
    }

    #[test]
    fn test_create_body() {
        let body = DataElementSpec.create_body(&config()).unwrap();
        let root = parse(&body).unwrap();
        assert_eq!(root.name, "blue:wbobj");
        assert_eq!(root.attr("adtcore:type"), Some("DTEL/DE"));
        let dtel = root.child("dtel:dataElement").unwrap();
        assert_eq!(dtel.child_text("typeKind"), Some("predefinedAbapType"));
        assert_eq!(dtel.child_text("typeName"), Some(""));
        assert_eq!(dtel.child_text("dataType"), Some("CURR"));
        assert_eq!(dtel.child_text("dataTypeLength"), Some("15"));
        assert_eq!(dtel.child_text("dataTypeDecimals"), Some("2"));
        assert_eq!(dtel.child_text("shortFieldLabel"), Some("Invoice am"));
        assert_eq!(dtel.child_text("headingFieldMaxLength"), Some("55"));
        assert_eq!(dtel.child_text("changeDocument"), Some("false"));
    }

    #[test]
    fn test_domain_typed() {
        let config = DataElementConfig::new(
            ObjectHeader::new("ZDTEL_STATUS", "ZDEMO", "Status"),
            DataElementType::domain("zdoma_status"),
        )
        .with_parameter_id("zst")
        .with_change_document(true);
        let root = parse(&DataElementSpec.create_body(&config).unwrap()).unwrap();
        let dtel = root.child("dataElement").unwrap();
        assert_eq!(dtel.child_text("typeKind"), Some("domain"));
        assert_eq!(dtel.child_text("typeName"), Some("ZDOMA_STATUS"));
        assert_eq!(dtel.child_text("setGetParameter"), Some("ZST"));
        assert_eq!(dtel.child_text("changeDocument"), Some("true"));
    }

    #[test]
    fn test_validation() {
        assert!(config().validate().is_ok());
        let missing = DataElementConfig::new(
            ObjectHeader::new("ZDTEL_X", "ZDEMO", "X"),
            DataElementType::Domain(String::new()),
        );
        let err = missing.validate().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_update_puts_definition_under_lock() {
        let server = MockServer::start().await;
        let uri = "/sap/bc/adt/ddic/dataelements/zdtel_amount";
        Mock::given(method("POST"))
            .and(path(uri))
            .and(query_param("_action", "LOCK"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LOCK_RESPONSE))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(uri))
            .and(query_param("lockHandle", "LH-4711"))
            .and(query_param("corrNr", "DEVK900123"))
            .and(header("Content-Type", "application/vnd.sap.adt.dataelements.v2+xml"))
            .and(body_string_contains("<dtel:dataType>CURR</dtel:dataType>"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(uri))
            .and(query_param("_action", "UNLOCK"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/sap/bc/adt/checkruns"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/sap/bc/adt/activation"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let elements = AdtDataElement::new(connection(&server).await);
        let result = elements
            .update(&config(), UpdateOptions::default())
            .await
            .unwrap();
        assert!(result.updated);
        assert_eq!(
            result.lock.and_then(|l| l.corr_nr).as_deref(),
            Some("DEVK900123")
        );
    }
}
