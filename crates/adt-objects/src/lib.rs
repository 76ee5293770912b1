//! # adt-objects
//!
//! SAP ADT repository objects on top of [`abap_adt_client`].
//!
//! This crate provides:
//! - [`ObjectKind`] and [`ObjectRef`]: the fixed URL templates and content
//!   types of every supported object kind
//! - [`ObjectClient`]: one method per ADT verb (create, read, lock, write,
//!   unlock, check, activate, delete, validate, transports)
//! - [`workflow`]: the lock chain that sequences those verbs and releases the
//!   lock when a step fails
//! - Per-kind handles such as [`AdtClass`] or [`AdtDataElement`], and
//!   step-by-step builders such as [`DataElementBuilder`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use abap_adt_objects::{AdtProgram, CreateOptions, ObjectHeader, ProgramConfig};
//!
//! let programs = AdtProgram::new(conn);
//! let config = ProgramConfig::new(
//!     ObjectHeader::new("ZHELLO", "$TMP", "Hello world"),
//! )
//! .with_source("REPORT zhello.\nWRITE 'Hello'.");
//!
//! let result = programs.create(&config, CreateOptions::default()).await?;
//! assert!(result.activation.is_some_and(|a| a.success));
//! ```

pub mod builder;
pub mod client;
mod error;
mod object_kind;
pub mod objects;
pub mod types;
pub mod workflow;

pub use builder::{
    BuilderState, BuilderStep, ClassBuilder, DataElementBuilder, DomainBuilder, ObjectBuilder,
    StepError,
};
pub use client::{
    CheckObject, ObjectClient, TransportCheck, TransportHeader, TransportObject,
    TransportRequest, TransportTask,
};
pub use error::{Error, ErrorKind, Result};
pub use object_kind::{ObjectKind, ObjectRef, ValidationEndpoint};
pub use objects::behavior_definition::{
    AdtBehaviorDefinition, BehaviorDefinitionConfig, BehaviorDefinitionSpec, ImplementationType,
};
pub use objects::behavior_implementation::{
    behavior_pool_source, AdtBehaviorImplementation, BehaviorImplementationConfig,
    BehaviorImplementationSpec,
};
pub use objects::class::{AdtClass, ClassConfig, ClassInclude, ClassSpec, Visibility};
pub use objects::data_element::{
    AdtDataElement, DataElementConfig, DataElementSpec, DataElementType, FieldLabels,
};
pub use objects::domain::{AdtDomain, DomainConfig, DomainSpec, FixedValue};
pub use objects::function_group::{AdtFunctionGroup, FunctionGroupConfig, FunctionGroupSpec};
pub use objects::function_module::{
    AdtFunctionModule, FunctionModuleConfig, FunctionModuleSpec,
};
pub use objects::include::{AdtInclude, IncludeConfig, IncludeSpec};
pub use objects::interface::{AdtInterface, InterfaceConfig, InterfaceSpec};
pub use objects::metadata_extension::{
    AdtMetadataExtension, MetadataExtensionConfig, MetadataExtensionSpec,
};
pub use objects::package::{AdtPackage, PackageConfig, PackageSpec, PackageType};
pub use objects::program::{AdtProgram, ProgramConfig, ProgramSpec};
pub use objects::service_definition::{
    AdtServiceDefinition, ServiceDefinitionConfig, ServiceDefinitionSpec,
};
pub use objects::structure::{AdtStructure, StructureConfig, StructureSpec};
pub use objects::table::{AdtTable, TableConfig, TableSpec};
pub use objects::view::{AdtView, ViewConfig, ViewSpec};
pub use objects::{Adt, ObjectConfig, ObjectHeader, ObjectSpec, SourceConfig};
pub use types::{
    ActivationMessage, ActivationResult, CheckMessage, CheckReport, CheckRunReport,
    CreateOptions, DeletionCheck, LockResult, ObjectMetadata, ObjectReference, Severity,
    UpdateOptions, ValidationResult, Version, WorkflowResult,
};
pub use workflow::UpdatePayload;
