//! Per-kind object handles.
//!
//! Each kind contributes a config type and an [`ObjectSpec`] that knows the
//! XML the kind is created with and what an update writes. [`Adt`] runs the
//! generic create/update chains over any [`ObjectSpec`].

use abap_adt_client::security::{names, xml};
use abap_adt_client::AdtConnection;
use tracing::instrument;

use crate::client::xml_helpers::{ADTCORE_NS, XML_DECL};
use crate::client::{CheckObject, ObjectClient};
use crate::error::{Error, ErrorKind, Result};
use crate::object_kind::{ObjectKind, ObjectRef};
use crate::types::{
    ActivationResult, CheckReport, CreateOptions, LockResult, ObjectMetadata, UpdateOptions,
    ValidationResult, Version, WorkflowResult,
};
use crate::workflow::{self, UpdatePayload};

pub mod behavior_definition;
pub mod behavior_implementation;
pub mod class;
pub mod data_element;
pub mod domain;
pub mod function_group;
pub mod function_module;
pub mod include;
pub mod interface;
pub mod metadata_extension;
pub mod package;
pub mod program;
pub mod service_definition;
pub mod structure;
pub mod table;
pub mod view;

/// Maximum length of `adtcore:description`.
pub const MAX_DESCRIPTION_LENGTH: usize = 60;

/// Fields every object config carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectHeader {
    pub name: String,
    pub package: String,
    pub description: String,
    pub transport: Option<String>,
    pub responsible: Option<String>,
    pub master_language: String,
}

impl ObjectHeader {
    pub fn new(
        name: impl Into<String>,
        package: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: upper(name),
            package: upper(package),
            description: description.into(),
            transport: None,
            responsible: None,
            master_language: "EN".to_string(),
        }
    }

    pub fn with_transport(mut self, transport: impl Into<String>) -> Self {
        self.transport = Some(upper(transport));
        self
    }

    pub fn with_responsible(mut self, user: impl Into<String>) -> Self {
        self.responsible = Some(upper(user));
        self
    }

    pub fn with_master_language(mut self, language: impl Into<String>) -> Self {
        self.master_language = upper(language);
        self
    }

    /// Check the fields a create needs.
    pub fn validate(&self) -> Result<()> {
        self.check_fields(true)
    }

    /// Function modules inherit the package of their group.
    pub(crate) fn check_fields(&self, package_required: bool) -> Result<()> {
        if self.name.is_empty() {
            return Err(invalid("object name is required"));
        }
        if package_required && self.package.is_empty() {
            return Err(invalid("package is required"));
        }
        if self.description.trim().is_empty() {
            return Err(invalid("description is required"));
        }
        if self.description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(invalid(&format!(
                "description exceeds {MAX_DESCRIPTION_LENGTH} characters"
            )));
        }
        if let Some(transport) = &self.transport {
            if !names::is_valid_transport(transport) {
                return Err(invalid(&format!("invalid transport '{transport}'")));
            }
        }
        Ok(())
    }

    /// `adtcore:*` attributes of the root element, including namespace.
    pub(crate) fn root_attributes(&self, kind: ObjectKind) -> String {
        let responsible = self
            .responsible
            .as_deref()
            .map(|r| format!(" adtcore:responsible=\"{}\"", xml::escape(r)))
            .unwrap_or_default();
        format!(
            "xmlns:adtcore=\"{ADTCORE_NS}\" adtcore:description=\"{}\" adtcore:language=\"{lang}\" adtcore:name=\"{}\" adtcore:type=\"{}\" adtcore:masterLanguage=\"{lang}\"{responsible}",
            xml::escape(&self.description),
            xml::escape(&self.name),
            kind.adt_type(),
            lang = xml::escape(&self.master_language),
        )
    }

    /// `<adtcore:packageRef/>` element.
    pub(crate) fn package_ref(&self) -> String {
        format!(
            "<adtcore:packageRef adtcore:name=\"{}\"/>",
            xml::escape(&self.package)
        )
    }
}

/// A kind-specific config.
pub trait ObjectConfig: Send + Sync {
    fn header(&self) -> &ObjectHeader;

    /// Main source to write after create or on update.
    fn source(&self) -> Option<&str> {
        None
    }

    /// Kind-specific field checks, run before any request.
    fn validate(&self) -> Result<()> {
        self.header().validate()
    }
}

/// Config of kinds that are a header plus one main source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub header: ObjectHeader,
    pub source: Option<String>,
}

impl SourceConfig {
    pub fn new(header: ObjectHeader) -> Self {
        Self {
            header,
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl ObjectConfig for SourceConfig {
    fn header(&self) -> &ObjectHeader {
        &self.header
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

/// What distinguishes one object kind from another.
pub trait ObjectSpec: Send + Sync {
    type Config: ObjectConfig;

    fn kind(&self) -> ObjectKind;

    /// Reference an object of this kind by name.
    fn object_ref(&self, name: &str) -> Result<ObjectRef> {
        ObjectRef::new(self.kind(), name)
    }

    /// XML posted to the collection on create.
    fn create_body(&self, config: &Self::Config) -> Result<String>;

    /// Writes performed under the lock by an update.
    ///
    /// Source-based kinds write their main source; definition-only kinds
    /// PUT the same XML they are created with.
    fn update_payloads(
        &self,
        object: &ObjectRef,
        config: &Self::Config,
    ) -> Result<Vec<UpdatePayload>> {
        if object.kind.is_source_based() {
            Ok(config
                .source()
                .map(|source| vec![UpdatePayload::source(object.source_uri(), source)])
                .unwrap_or_default())
        } else {
            Ok(vec![UpdatePayload::metadata(
                object.uri.clone(),
                object.kind.content_type(),
                self.create_body(config)?,
            )])
        }
    }

    /// Writes performed right after create.
    fn create_payloads(
        &self,
        object: &ObjectRef,
        config: &Self::Config,
    ) -> Result<Vec<UpdatePayload>> {
        self.update_payloads(object, config)
    }
}

/// High-level handle for one object kind.
#[derive(Debug, Clone)]
pub struct Adt<S> {
    client: ObjectClient,
    spec: S,
}

impl<S: ObjectSpec + Default> Adt<S> {
    pub fn new(conn: AdtConnection) -> Self {
        Self::with_spec(conn, S::default())
    }
}

impl<S: ObjectSpec> Adt<S> {
    pub fn with_spec(conn: AdtConnection, spec: S) -> Self {
        Self {
            client: ObjectClient::new(conn),
            spec,
        }
    }

    /// Low-level verbs over the same connection.
    pub fn client(&self) -> &ObjectClient {
        &self.client
    }

    pub fn spec(&self) -> &S {
        &self.spec
    }

    pub fn object(&self, name: &str) -> Result<ObjectRef> {
        self.spec.object_ref(name)
    }

    /// Ask the backend whether the object may be created.
    #[instrument(skip(self, config), fields(name = %config.header().name))]
    pub async fn validate(&self, config: &S::Config) -> Result<ValidationResult> {
        config.validate()?;
        let header = config.header();
        let object = self.object(&header.name)?;
        self.client
            .validate(&object, &header.package, &header.description)
            .await
    }

    /// Create the object and write its initial content.
    #[instrument(skip(self, config), fields(name = %config.header().name))]
    pub async fn create(
        &self,
        config: &S::Config,
        options: CreateOptions,
    ) -> Result<WorkflowResult> {
        config.validate()?;
        let object = self.object(&config.header().name)?;
        let body = self.spec.create_body(config)?;
        let payloads = self.spec.create_payloads(&object, config)?;
        workflow::create_and_update(
            &self.client,
            &object,
            body,
            &payloads,
            config.header().transport.as_deref(),
            options,
        )
        .await
    }

    /// Read the object's definition.
    pub async fn read(&self, name: &str) -> Result<ObjectMetadata> {
        self.client.read_metadata(&self.object(name)?).await
    }

    /// Read the main source.
    pub async fn read_source(&self, name: &str, version: Version) -> Result<String> {
        self.client.read_source(&self.object(name)?, version).await
    }

    /// Run the lock chain with the config's content.
    #[instrument(skip(self, config), fields(name = %config.header().name))]
    pub async fn update(
        &self,
        config: &S::Config,
        options: UpdateOptions,
    ) -> Result<WorkflowResult> {
        config.validate()?;
        let object = self.object(&config.header().name)?;
        let payloads = self.spec.update_payloads(&object, config)?;
        if payloads.is_empty() {
            return Err(invalid("nothing to update"));
        }
        workflow::lock_and_update(
            &self.client,
            &object,
            &payloads,
            config.header().transport.as_deref(),
            options,
        )
        .await
    }

    pub async fn delete(&self, name: &str, transport: Option<&str>) -> Result<()> {
        let object = self.object(name)?;
        self.client
            .delete(std::slice::from_ref(&object), transport)
            .await
    }

    pub async fn lock(&self, name: &str) -> Result<LockResult> {
        self.client.lock(&self.object(name)?).await
    }

    pub async fn unlock(&self, name: &str, lock_handle: &str) -> Result<()> {
        self.client.unlock(&self.object(name)?, lock_handle).await
    }

    /// Check the stored version, or `content` as the proposed main source.
    pub async fn check(
        &self,
        name: &str,
        version: Version,
        content: Option<&str>,
    ) -> Result<CheckReport> {
        let object = self.object(name)?;
        let check = match content {
            Some(content) => CheckObject {
                uri: object.uri.clone(),
                version,
                content: Some((object.source_uri(), content.to_string())),
            },
            None => CheckObject::stored(&object.uri, version),
        };
        self.client.check(&[check]).await
    }

    pub async fn activate(&self, name: &str) -> Result<ActivationResult> {
        self.client.activate(&self.object(name)?).await
    }
}

pub(crate) fn upper(value: impl Into<String>) -> String {
    let value: String = value.into();
    names::normalize(&value)
}

pub(crate) fn invalid(message: &str) -> Error {
    Error::new(ErrorKind::InvalidConfig(message.to_string()))
}

/// Wrap kind-specific content into a root element with the shared header.
pub(crate) fn document(
    root: &str,
    namespaces: &str,
    header: &ObjectHeader,
    kind: ObjectKind,
    extra_attributes: &str,
    content: &str,
) -> String {
    format!(
        "{XML_DECL}\n<{root} {namespaces} {}{extra_attributes}>\n  {}{content}\n</{root}>",
        header.root_attributes(kind),
        header.package_ref(),
    )
}

/// `<prefix:name>value</prefix:name>`, escaped.
pub(crate) fn element(name: &str, value: &str) -> String {
    format!("<{name}>{}</{name}>", xml::escape(value))
}

pub(crate) fn flag(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
