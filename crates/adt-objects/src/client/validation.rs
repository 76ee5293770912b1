use tracing::{debug, instrument};

use super::xml_helpers::{data_field, parse};
use crate::error::Result;
use crate::object_kind::{ObjectRef, ValidationEndpoint};
use crate::types::ValidationResult;

const OBJECTNAME_VALIDATION_PATH: &str = "/sap/bc/adt/oo/validation/objectname";
const FUNCTIONS_VALIDATION_PATH: &str = "/sap/bc/adt/functions/validation";

impl super::ObjectClient {
    /// Validate a name before creating the object.
    ///
    /// A non-OK severity is returned as data, not as an error; callers
    /// decide whether a warning blocks the create.
    #[instrument(skip(self, description), fields(uri = %object.uri))]
    pub async fn validate(
        &self,
        object: &ObjectRef,
        package: &str,
        description: &str,
    ) -> Result<ValidationResult> {
        let request = match object.kind.validation_endpoint() {
            ValidationEndpoint::ObjectName => self
                .conn
                .post(OBJECTNAME_VALIDATION_PATH)
                .query("objname", &object.name)
                .query("packagename", package)
                .query("description", description)
                .query("objtype", object.kind.adt_type()),
            ValidationEndpoint::Functions => {
                let request = self
                    .conn
                    .post(FUNCTIONS_VALIDATION_PATH)
                    .query("objtype", object.kind.adt_type());
                match &object.group {
                    Some(group) => request
                        .query("fugrname", group)
                        .query("objname", &object.name)
                        .query("description", description),
                    None => request
                        .query("objname", &object.name)
                        .query("packagename", package)
                        .query("description", description),
                }
            }
            ValidationEndpoint::Collection => self
                .conn
                .post(&format!("{}/validation", object.kind.collection()))
                .query("objname", &object.name)
                .query("description", description),
        }
        .accept("application/vnd.sap.as+xml");

        let body = self.conn.send_text(request).await?;
        let result = parse_validation_result(&body)?;
        debug!(severity = %result.severity, "Name validated");
        Ok(result)
    }
}

pub(crate) fn parse_validation_result(body: &str) -> Result<ValidationResult> {
    if body.trim().is_empty() {
        return Ok(ValidationResult {
            severity: "OK".to_string(),
            ..Default::default()
        });
    }
    let root = parse(body)?;
    Ok(ValidationResult {
        severity: data_field(&root, "SEVERITY").unwrap_or_else(|| "OK".to_string()),
        short_text: data_field(&root, "SHORT_TEXT").unwrap_or_default(),
        long_text: data_field(&root, "LONG_TEXT").unwrap_or_default(),
    })
}
