//! ABAP classes (`CLAS/OC`).

use abap_adt_client::security::xml;

use super::{document, flag, upper, Adt, ObjectConfig, ObjectHeader, ObjectSpec};
use crate::error::Result;
use crate::object_kind::{ObjectKind, ObjectRef};
use crate::workflow::UpdatePayload;

pub(crate) const CLASS_NS: &str = "http://www.sap.com/adt/oo/classes";

/// Handle for classes.
pub type AdtClass = Adt<ClassSpec>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

/// Class-local includes that exist for every class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassInclude {
    /// Local type definitions.
    Definitions,
    /// Local class implementations (behavior handlers live here).
    Implementations,
    Macros,
}

impl ClassInclude {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassInclude::Definitions => "definitions",
            ClassInclude::Implementations => "implementations",
            ClassInclude::Macros => "macros",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassConfig {
    pub header: ObjectHeader,
    pub is_final: bool,
    pub is_abstract: bool,
    pub visibility: Visibility,
    pub superclass: Option<String>,
    pub source: Option<String>,
    pub includes: Vec<(ClassInclude, String)>,
}

impl ClassConfig {
    pub fn new(header: ObjectHeader) -> Self {
        Self {
            header,
            is_final: true,
            is_abstract: false,
            visibility: Visibility::Public,
            superclass: None,
            source: None,
            includes: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_superclass(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(upper(superclass));
        self
    }

    pub fn with_include(mut self, include: ClassInclude, source: impl Into<String>) -> Self {
        self.includes.push((include, source.into()));
        self
    }

    pub fn abstract_class(mut self) -> Self {
        self.is_abstract = true;
        self.is_final = false;
        self
    }
}

impl ObjectConfig for ClassConfig {
    fn header(&self) -> &ObjectHeader {
        &self.header
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

/// `class:abapClass` document shared by classes and behavior pools.
pub(crate) fn class_document(
    header: &ObjectHeader,
    kind: ObjectKind,
    is_final: bool,
    is_abstract: bool,
    visibility: Visibility,
    superclass: Option<&str>,
) -> String {
    let superclass = superclass
        .map(|s| {
            format!(
                "\n  <class:superClassRef adtcore:name=\"{}\"/>",
                xml::escape(s)
            )
        })
        .unwrap_or_default();
    let attributes = format!(
        " class:final=\"{}\" class:visibility=\"{}\" class:abstract=\"{}\"",
        flag(is_final),
        visibility.as_str(),
        flag(is_abstract)
    );
    document(
        "class:abapClass",
        &format!("xmlns:class=\"{CLASS_NS}\""),
        header,
        kind,
        &attributes,
        &format!(
            "\n  <class:include adtcore:name=\"CLAS/OC\" adtcore:type=\"CLAS/OC\" class:includeType=\"testclasses\"/>{superclass}"
        ),
    )
}

/// Main source plus local includes, in write order.
pub(crate) fn class_payloads(
    object: &ObjectRef,
    source: Option<&str>,
    includes: &[(ClassInclude, String)],
) -> Vec<UpdatePayload> {
    source
        .map(|s| UpdatePayload::source(object.source_uri(), s))
        .into_iter()
        .chain(
            includes
                .iter()
                .map(|(include, s)| UpdatePayload::source(object.include_uri(include.as_str()), s.as_str())),
        )
        .collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClassSpec;

impl ObjectSpec for ClassSpec {
    type Config = ClassConfig;

    fn kind(&self) -> ObjectKind {
        ObjectKind::Class
    }

    fn create_body(&self, config: &ClassConfig) -> Result<String> {
        Ok(class_document(
            &config.header,
            ObjectKind::Class,
            config.is_final,
            config.is_abstract,
            config.visibility,
            config.superclass.as_deref(),
        ))
    }

    fn update_payloads(&self, object: &ObjectRef, config: &ClassConfig) -> Result<Vec<UpdatePayload>> {
        Ok(class_payloads(object, config.source(), &config.includes))
    }
}
