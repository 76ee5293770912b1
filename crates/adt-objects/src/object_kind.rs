//! Repository object kinds and their ADT endpoints.

use abap_adt_client::security::{names, url};

use crate::error::{Error, ErrorKind, Result};

/// Supported ABAP repository object kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Class,
    Interface,
    Program,
    Include,
    FunctionGroup,
    FunctionModule,
    DataElement,
    Domain,
    Table,
    Structure,
    View,
    BehaviorDefinition,
    BehaviorImplementation,
    ServiceDefinition,
    MetadataExtension,
    Package,
}

/// Where a kind's pre-create name validation lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationEndpoint {
    /// `/sap/bc/adt/oo/validation/objectname` with `objtype`.
    ObjectName,
    /// `/sap/bc/adt/functions/validation` with `objtype`.
    Functions,
    /// `{collection}/validation`.
    Collection,
}

impl ObjectKind {
    /// All kinds, in declaration order.
    pub const ALL: [ObjectKind; 16] = [
        ObjectKind::Class,
        ObjectKind::Interface,
        ObjectKind::Program,
        ObjectKind::Include,
        ObjectKind::FunctionGroup,
        ObjectKind::FunctionModule,
        ObjectKind::DataElement,
        ObjectKind::Domain,
        ObjectKind::Table,
        ObjectKind::Structure,
        ObjectKind::View,
        ObjectKind::BehaviorDefinition,
        ObjectKind::BehaviorImplementation,
        ObjectKind::ServiceDefinition,
        ObjectKind::MetadataExtension,
        ObjectKind::Package,
    ];

    /// Collection URI. Function modules live below their group, see
    /// [`ObjectRef::function_module`].
    pub fn collection(&self) -> &'static str {
        match self {
            ObjectKind::Class | ObjectKind::BehaviorImplementation => "/sap/bc/adt/oo/classes",
            ObjectKind::Interface => "/sap/bc/adt/oo/interfaces",
            ObjectKind::Program => "/sap/bc/adt/programs/programs",
            ObjectKind::Include => "/sap/bc/adt/programs/includes",
            ObjectKind::FunctionGroup | ObjectKind::FunctionModule => "/sap/bc/adt/functions/groups",
            ObjectKind::DataElement => "/sap/bc/adt/ddic/dataelements",
            ObjectKind::Domain => "/sap/bc/adt/ddic/domains",
            ObjectKind::Table => "/sap/bc/adt/ddic/tables",
            ObjectKind::Structure => "/sap/bc/adt/ddic/structures",
            ObjectKind::View => "/sap/bc/adt/ddic/ddl/sources",
            ObjectKind::BehaviorDefinition => "/sap/bc/adt/bo/behaviordefinitions",
            ObjectKind::ServiceDefinition => "/sap/bc/adt/ddic/srvd/sources",
            ObjectKind::MetadataExtension => "/sap/bc/adt/ddic/ddlx/sources",
            ObjectKind::Package => "/sap/bc/adt/packages",
        }
    }

    /// ADT object type (`adtcore:type`).
    pub fn adt_type(&self) -> &'static str {
        match self {
            ObjectKind::Class | ObjectKind::BehaviorImplementation => "CLAS/OC",
            ObjectKind::Interface => "INTF/OI",
            ObjectKind::Program => "PROG/P",
            ObjectKind::Include => "PROG/I",
            ObjectKind::FunctionGroup => "FUGR/F",
            ObjectKind::FunctionModule => "FUGR/FF",
            ObjectKind::DataElement => "DTEL/DE",
            ObjectKind::Domain => "DOMA/DD",
            ObjectKind::Table => "TABL/DT",
            ObjectKind::Structure => "TABL/DS",
            ObjectKind::View => "DDLS/DF",
            ObjectKind::BehaviorDefinition => "BDEF/BDO",
            ObjectKind::ServiceDefinition => "SRVD/SRV",
            ObjectKind::MetadataExtension => "DDLX/EX",
            ObjectKind::Package => "DEVC/K",
        }
    }

    /// Content type of the create (and metadata update) payload.
    pub fn content_type(&self) -> &'static str {
        match self {
            ObjectKind::Class | ObjectKind::BehaviorImplementation => {
                "application/vnd.sap.adt.oo.classes.v4+xml"
            }
            ObjectKind::Interface => "application/vnd.sap.adt.oo.interfaces.v5+xml",
            ObjectKind::Program => "application/vnd.sap.adt.programs.programs.v2+xml",
            ObjectKind::Include => "application/vnd.sap.adt.programs.includes.v2+xml",
            ObjectKind::FunctionGroup => "application/vnd.sap.adt.functions.groups.v3+xml",
            ObjectKind::FunctionModule => "application/vnd.sap.adt.functions.fmodules.v3+xml",
            ObjectKind::DataElement => "application/vnd.sap.adt.dataelements.v2+xml",
            ObjectKind::Domain => "application/vnd.sap.adt.domains.v2+xml",
            ObjectKind::Table => "application/vnd.sap.adt.tables.v2+xml",
            ObjectKind::Structure => "application/vnd.sap.adt.structures.v2+xml",
            ObjectKind::View => "application/vnd.sap.adt.ddlSource.v2+xml",
            ObjectKind::BehaviorDefinition => "application/vnd.sap.adt.blues.v1+xml",
            ObjectKind::ServiceDefinition => "application/vnd.sap.adt.ddic.srvd.v1+xml",
            ObjectKind::MetadataExtension => "application/vnd.sap.adt.ddic.ddlx.v1+xml",
            ObjectKind::Package => "application/vnd.sap.adt.packages.v1+xml",
        }
    }

    /// True if the object's content is an ABAP/DDL source (`/source/main`).
    pub fn is_source_based(&self) -> bool {
        !matches!(
            self,
            ObjectKind::DataElement | ObjectKind::Domain | ObjectKind::FunctionGroup | ObjectKind::Package
        )
    }

    /// Packages are neither checked nor activated.
    pub fn is_activatable(&self) -> bool {
        !matches!(self, ObjectKind::Package)
    }

    pub fn validation_endpoint(&self) -> ValidationEndpoint {
        match self {
            ObjectKind::Class | ObjectKind::Interface | ObjectKind::BehaviorImplementation => {
                ValidationEndpoint::ObjectName
            }
            ObjectKind::FunctionGroup | ObjectKind::FunctionModule => ValidationEndpoint::Functions,
            _ => ValidationEndpoint::Collection,
        }
    }

    /// Look up a kind by ADT type. `CLAS/OC` resolves to [`ObjectKind::Class`].
    pub fn from_adt_type(adt_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.adt_type().eq_ignore_ascii_case(adt_type))
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.adt_type())
    }
}

/// A concrete repository object: kind, upper-case name and URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub kind: ObjectKind,
    pub name: String,
    pub uri: String,
    /// Owning function group, for function modules.
    pub group: Option<String>,
}

impl ObjectRef {
    /// Reference an object by kind and name.
    pub fn new(kind: ObjectKind, name: &str) -> Result<Self> {
        if kind == ObjectKind::FunctionModule {
            return Err(invalid("function modules need their group, use ObjectRef::function_module"));
        }
        let name = if kind == ObjectKind::Package {
            checked_package_name(name)?
        } else {
            checked_name(name)?
        };
        Ok(Self {
            kind,
            uri: format!("{}/{}", kind.collection(), url::object_segment(&name)),
            name,
            group: None,
        })
    }

    /// Reference a function module inside its group.
    pub fn function_module(group: &str, name: &str) -> Result<Self> {
        let group = checked_name(group)?;
        let name = checked_name(name)?;
        Ok(Self {
            kind: ObjectKind::FunctionModule,
            uri: format!(
                "{}/{}/fmodules/{}",
                ObjectKind::FunctionModule.collection(),
                url::object_segment(&group),
                url::object_segment(&name)
            ),
            name,
            group: Some(group),
        })
    }

    /// URI of the main source.
    pub fn source_uri(&self) -> String {
        format!("{}/source/main", self.uri)
    }

    /// URI of a class include (`implementations`, `testclasses`, ...).
    pub fn include_uri(&self, include: &str) -> String {
        format!("{}/includes/{}", self.uri, include)
    }

    /// Collection the object is created in.
    pub fn create_uri(&self) -> String {
        match &self.group {
            Some(group) => format!(
                "{}/{}/fmodules",
                ObjectKind::FunctionModule.collection(),
                url::object_segment(group)
            ),
            None => self.kind.collection().to_string(),
        }
    }
}

fn checked_name(name: &str) -> Result<String> {
    let name = names::normalize(name);
    if !names::is_valid_object_name(&name) {
        return Err(invalid(&format!("invalid object name '{name}'")));
    }
    Ok(name)
}

fn checked_package_name(name: &str) -> Result<String> {
    let name = names::normalize(name);
    if !names::is_valid_package_name(&name) {
        return Err(invalid(&format!("invalid package name '{name}'")));
    }
    Ok(name)
}

fn invalid(message: &str) -> Error {
    Error::new(ErrorKind::InvalidConfig(message.to_string()))
}
