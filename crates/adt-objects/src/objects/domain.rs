//! Domains (`DOMA/DD`).

use abap_adt_client::security::xml;

use super::{document, element, flag, invalid, upper, Adt, ObjectConfig, ObjectHeader, ObjectSpec};
use crate::error::Result;
use crate::object_kind::ObjectKind;

pub type AdtDomain = Adt<DomainSpec>;

const DOMAIN_NS: &str = "http://www.sap.com/dictionary/domain";

/// Maximum length of a fixed value text.
pub const FIXED_VALUE_TEXT_LENGTH: usize = 60;

/// One entry of the fixed value list (single value or `low`..`high` range).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedValue {
    pub low: String,
    pub high: Option<String>,
    pub text: String,
}

impl FixedValue {
    pub fn new(low: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            low: low.into(),
            high: None,
            text: text.into(),
        }
    }

    pub fn range(low: impl Into<String>, high: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            low: low.into(),
            high: Some(high.into()),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainConfig {
    pub header: ObjectHeader,
    pub data_type: String,
    pub length: u32,
    pub decimals: u32,
    /// Defaults to `length` when unset.
    pub output_length: Option<u32>,
    pub conversion_exit: Option<String>,
    pub sign_exists: bool,
    pub lowercase: bool,
    pub value_table: Option<String>,
    pub fixed_values: Vec<FixedValue>,
}

impl DomainConfig {
    pub fn new(header: ObjectHeader, data_type: impl Into<String>, length: u32) -> Self {
        Self {
            header,
            data_type: upper(data_type),
            length,
            decimals: 0,
            output_length: None,
            conversion_exit: None,
            sign_exists: false,
            lowercase: false,
            value_table: None,
            fixed_values: Vec::new(),
        }
    }

    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn with_output_length(mut self, length: u32) -> Self {
        self.output_length = Some(length);
        self
    }

    pub fn with_conversion_exit(mut self, exit: impl Into<String>) -> Self {
        self.conversion_exit = Some(upper(exit));
        self
    }

    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    pub fn with_sign(mut self, sign: bool) -> Self {
        self.sign_exists = sign;
        self
    }

    pub fn with_value_table(mut self, table: impl Into<String>) -> Self {
        self.value_table = Some(upper(table));
        self
    }

    pub fn with_fixed_value(mut self, value: FixedValue) -> Self {
        self.fixed_values.push(value);
        self
    }
}

impl ObjectConfig for DomainConfig {
    fn header(&self) -> &ObjectHeader {
        &self.header
    }

    fn validate(&self) -> Result<()> {
        self.header.validate()?;
        if self.data_type.is_empty() {
            return Err(invalid("domain data type is required"));
        }
        if self.decimals > self.length {
            return Err(invalid("domain decimals exceed its length"));
        }
        if self.fixed_values.iter().any(|v| v.low.is_empty()) {
            return Err(invalid("fixed value without a low value"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DomainSpec;

impl ObjectSpec for DomainSpec {
    type Config = DomainConfig;

    fn kind(&self) -> ObjectKind {
        ObjectKind::Domain
    }

    fn create_body(&self, config: &DomainConfig) -> Result<String> {
        Ok(document(
            "doma:domain",
            &format!("xmlns:doma=\"{DOMAIN_NS}\""),
            &config.header,
            ObjectKind::Domain,
            "",
            &domain_content(config),
        ))
    }
}

fn domain_content(config: &DomainConfig) -> String {
    let fixed_values: String = config
        .fixed_values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let text: String = value.text.chars().take(FIXED_VALUE_TEXT_LENGTH).collect();
            format!(
                "\n          <doma:fixValue>\n            {}\n            {}\n            {}\n            {}\n          </doma:fixValue>",
                element("doma:position", &format!("{:04}", i + 1)),
                element("doma:low", &value.low),
                element("doma:high", value.high.as_deref().unwrap_or_default()),
                element("doma:text", &text),
            )
        })
        .collect();

    format!(
        r#"
  <doma:content>
    <doma:typeInformation>
      {}
      {}
      {}
    </doma:typeInformation>
    <doma:outputInformation>
      {}
      <doma:style>00</doma:style>
      {}
      {}
      {}
      <doma:ampmFormat>false</doma:ampmFormat>
    </doma:outputInformation>
    <doma:valueInformation>
      <doma:valueTableRef adtcore:name="{}"/>
      <doma:appendExists>false</doma:appendExists>
      <doma:fixValues>{fixed_values}
      </doma:fixValues>
    </doma:valueInformation>
  </doma:content>"#,
        element("doma:datatype", &config.data_type),
        element("doma:length", &format!("{:06}", config.length)),
        element("doma:decimals", &format!("{:06}", config.decimals)),
        element(
            "doma:length",
            &format!("{:06}", config.output_length.unwrap_or(config.length))
        ),
        element(
            "doma:conversionExit",
            config.conversion_exit.as_deref().unwrap_or_default()
        ),
        element("doma:signExists", flag(config.sign_exists)),
        element("doma:lowercase", flag(config.lowercase)),
        xml::escape(config.value_table.as_deref().unwrap_or_default()),
    )
}
