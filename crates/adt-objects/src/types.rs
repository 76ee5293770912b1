//! Request and response types shared by all object kinds.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Which version of an object to read or check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Version {
    #[default]
    Active,
    Inactive,
    /// The working area: inactive if one exists, otherwise active.
    Workingarea,
}

impl Version {
    pub fn as_str(&self) -> &'static str {
        match self {
            Version::Active => "active",
            Version::Inactive => "inactive",
            Version::Workingarea => "workingArea",
        }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a successful lock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LockResult {
    /// Opaque handle required by update and unlock.
    pub lock_handle: String,
    /// Transport request the object is recorded on.
    pub corr_nr: Option<String>,
    pub corr_user: Option<String>,
    pub corr_text: Option<String>,
    /// Object belongs to a local (`$`) package.
    pub is_local: bool,
    pub is_link_up: bool,
    pub modification_support: Option<String>,
}

/// Severity of a check or activation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Other,
}

impl Severity {
    /// Map the one-letter ADT message type (`E`, `W`, `I`, `A`, `X`, `S`).
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "E" | "A" | "X" => Severity::Error,
            "W" => Severity::Warning,
            "I" | "S" => Severity::Info,
            _ => Severity::Other,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }
}

/// A message from a check run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckMessage {
    /// URI of the affected artifact, without the position fragment.
    pub uri: String,
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub severity: Severity,
    pub text: String,
    pub category: Option<String>,
}

/// Report of one reporter for one object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckRunReport {
    pub reporter: String,
    pub triggering_uri: String,
    pub status: String,
    pub status_text: String,
    pub messages: Vec<CheckMessage>,
}

/// Aggregated result of a check run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub reports: Vec<CheckRunReport>,
}

impl CheckReport {
    /// All messages across reports.
    pub fn messages(&self) -> impl Iterator<Item = &CheckMessage> {
        self.reports.iter().flat_map(|r| r.messages.iter())
    }

    /// Messages with error severity.
    pub fn errors(&self) -> Vec<CheckMessage> {
        self.messages()
            .filter(|m| m.severity.is_error())
            .cloned()
            .collect()
    }

    pub fn has_errors(&self) -> bool {
        self.messages().any(|m| m.severity.is_error())
    }
}

/// A message returned by activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivationMessage {
    pub severity: Severity,
    pub text: String,
    pub href: Option<String>,
    pub line: Option<u32>,
    pub object_description: Option<String>,
}

/// Reference to an object as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ObjectReference {
    pub uri: String,
    pub name: String,
    pub object_type: String,
    pub parent_uri: Option<String>,
}

/// Result of an activation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivationResult {
    /// No error messages and nothing left inactive.
    pub success: bool,
    pub messages: Vec<ActivationMessage>,
    /// Objects still inactive after the request.
    pub inactive: Vec<ObjectReference>,
}

impl ActivationResult {
    pub fn errors(&self) -> Vec<ActivationMessage> {
        self.messages
            .iter()
            .filter(|m| m.severity.is_error())
            .cloned()
            .collect()
    }
}

/// Outcome of a pre-create name validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// `OK`, `WARNING` or `ERROR` as sent by the backend.
    pub severity: String,
    pub short_text: String,
    pub long_text: String,
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        let severity = self.severity.trim();
        severity.is_empty() || severity.eq_ignore_ascii_case("ok")
    }
}

/// Common metadata every object carries in its `adtcore` attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ObjectMetadata {
    pub uri: String,
    pub name: String,
    pub object_type: String,
    pub description: String,
    pub package: Option<String>,
    pub responsible: Option<String>,
    pub master_language: Option<String>,
    pub version: Option<String>,
    pub changed_by: Option<String>,
    pub changed_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    /// Raw XML as returned by the backend.
    #[serde(skip)]
    pub raw: String,
}

/// Deletability of one object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionCheck {
    pub uri: String,
    pub deletable: bool,
    pub message: Option<String>,
}

/// Options for [`Adt::create`](crate::Adt::create).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateOptions {
    /// Activate after creation.
    pub activate: bool,
    /// Delete the object again when a later step fails.
    pub delete_on_failure: bool,
    /// Run a syntax check after the initial content is written.
    pub check: bool,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            activate: true,
            delete_on_failure: false,
            check: true,
        }
    }
}

/// Options for [`Adt::update`](crate::Adt::update).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Activate after unlocking.
    pub activate: bool,
    /// Check the proposed content before writing it.
    pub check_before_update: bool,
    /// Check the inactive version after unlocking.
    pub check_after_unlock: bool,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            activate: true,
            check_before_update: false,
            check_after_unlock: true,
        }
    }
}

/// What a create or update chain did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkflowResult {
    pub created: bool,
    pub lock: Option<LockResult>,
    pub updated: bool,
    pub check: Option<CheckReport>,
    pub activation: Option<ActivationResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(severity: Severity) -> CheckMessage {
        CheckMessage {
            uri: "/sap/bc/adt/programs/programs/z/source/main".into(),
            line: Some(1),
            column: Some(0),
            severity,
            text: "text".into(),
            category: None,
        }
    }

    #[test]
    fn test_severity_codes() {
        assert_eq!(Severity::from_code("E"), Severity::Error);
        assert_eq!(Severity::from_code("a"), Severity::Error);
        assert_eq!(Severity::from_code("W"), Severity::Warning);
        assert_eq!(Severity::from_code("I"), Severity::Info);
        assert_eq!(Severity::from_code(""), Severity::Other);
    }

    #[test]
    fn test_check_report_errors() {
        let report = CheckReport {
            reports: vec![CheckRunReport {
                messages: vec![message(Severity::Warning), message(Severity::Error)],
                ..Default::default()
            }],
        };
        assert!(report.has_errors());
        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.messages().count(), 2);
        assert!(!CheckReport::default().has_errors());
    }

    #[test]
    fn test_validation_ok() {
        assert!(ValidationResult::default().is_ok());
        assert!(ValidationResult {
            severity: "OK".into(),
            ..Default::default()
        }
        .is_ok());
        assert!(!ValidationResult {
            severity: "ERROR".into(),
            short_text: "Class ZCL_X already exists".into(),
            long_text: String::new(),
        }
        .is_ok());
    }

    #[test]
    fn test_option_defaults() {
        let create = CreateOptions::default();
        assert!(create.activate && create.check && !create.delete_on_failure);
        let update = UpdateOptions::default();
        assert!(update.activate && update.check_after_unlock && !update.check_before_update);
        assert_eq!(Version::Workingarea.as_str(), "workingArea");
    }
}
