//! Lock-based modification chains.
//!
//! Every change to a repository object follows the same sequence:
//! lock (stateful session) → optional check of the proposed content →
//! writes under the lock handle → unlock (stateless session) → check of the
//! inactive version → optional activation. A failure after the lock was
//! acquired releases the lock before the original error is returned.

use tracing::{debug, instrument, warn};

use crate::client::{CheckObject, ObjectClient};
use crate::error::{Error, ErrorKind, Result};
use crate::object_kind::ObjectRef;
use crate::types::{
    ActivationResult, CheckReport, CreateOptions, LockResult, UpdateOptions, Version,
    WorkflowResult,
};

/// One write performed under a lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdatePayload {
    /// Plain-text source (`PUT {uri}` as `text/plain`).
    Source { uri: String, content: String },
    /// XML definition (`PUT {uri}` with a vendor content type).
    Metadata {
        uri: String,
        content_type: String,
        body: String,
    },
}

impl UpdatePayload {
    pub fn source(uri: impl Into<String>, content: impl Into<String>) -> Self {
        UpdatePayload::Source {
            uri: uri.into(),
            content: content.into(),
        }
    }

    pub fn metadata(
        uri: impl Into<String>,
        content_type: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        UpdatePayload::Metadata {
            uri: uri.into(),
            content_type: content_type.into(),
            body: body.into(),
        }
    }

    fn uri(&self) -> &str {
        match self {
            UpdatePayload::Source { uri, .. } | UpdatePayload::Metadata { uri, .. } => uri,
        }
    }
}

/// Write `payloads` to a locked object and optionally check and activate it.
#[instrument(skip(client, payloads), fields(uri = %object.uri, steps = payloads.len()))]
pub async fn lock_and_update(
    client: &ObjectClient,
    object: &ObjectRef,
    payloads: &[UpdatePayload],
    transport: Option<&str>,
    options: UpdateOptions,
) -> Result<WorkflowResult> {
    let lock = client.lock(object).await?;
    let mut result = WorkflowResult {
        lock: Some(lock.clone()),
        ..Default::default()
    };

    let written = write_locked(client, object, payloads, transport, &lock, options).await;
    if let Err(err) = written {
        force_unlock(client, object, &lock.lock_handle).await;
        return Err(err);
    }
    result.updated = true;

    client.unlock(object, &lock.lock_handle).await?;

    if options.check_after_unlock && object.kind.is_activatable() {
        result.check = check_stored(client, object).await?;
    }
    if options.activate && object.kind.is_activatable() {
        result.activation = Some(activate(client, object).await?);
    }
    Ok(result)
}

pub(crate) async fn write_locked(
    client: &ObjectClient,
    object: &ObjectRef,
    payloads: &[UpdatePayload],
    transport: Option<&str>,
    lock: &LockResult,
    options: UpdateOptions,
) -> Result<()> {
    if options.check_before_update && object.kind.is_activatable() {
        if let Some(UpdatePayload::Source { uri, content }) = payloads
            .iter()
            .find(|p| matches!(p, UpdatePayload::Source { .. }))
        {
            let check = client
                .check(&[CheckObject::with_content(&object.uri, uri, content)])
                .await;
            if let Some(report) = skip_unsupported(object, check)? {
                fail_on_errors(&report)?;
            }
        }
    }

    let corr_nr = transport.or(lock.corr_nr.as_deref());
    for payload in payloads {
        debug!(uri = payload.uri(), "Writing under lock");
        match payload {
            UpdatePayload::Source { uri, content } => {
                client
                    .update_source(uri, content, &lock.lock_handle, corr_nr)
                    .await?
            }
            UpdatePayload::Metadata {
                uri,
                content_type,
                body,
            } => {
                client
                    .update_metadata(uri, content_type, body.clone(), &lock.lock_handle, corr_nr)
                    .await?
            }
        }
    }
    Ok(())
}

/// Create an object, then write its initial content through the lock chain.
///
/// With `delete_on_failure` a failed later step removes the new object again.
#[instrument(skip(client, body, payloads), fields(uri = %object.uri))]
pub async fn create_and_update(
    client: &ObjectClient,
    object: &ObjectRef,
    body: String,
    payloads: &[UpdatePayload],
    transport: Option<&str>,
    options: CreateOptions,
) -> Result<WorkflowResult> {
    client.create(object, body, transport).await?;

    let outcome = if payloads.is_empty() {
        finish_unlocked(client, object, options).await
    } else {
        let update = UpdateOptions {
            activate: options.activate,
            check_before_update: false,
            check_after_unlock: options.check,
        };
        lock_and_update(client, object, payloads, transport, update).await
    };

    match outcome {
        Ok(mut result) => {
            result.created = true;
            Ok(result)
        }
        Err(err) => {
            if options.delete_on_failure {
                if let Err(delete_err) = client.delete(std::slice::from_ref(object), transport).await {
                    warn!(error = %delete_err, "Failed to delete object after failed create");
                } else {
                    debug!("Deleted partially created object");
                }
            }
            Err(err)
        }
    }
}

async fn finish_unlocked(
    client: &ObjectClient,
    object: &ObjectRef,
    options: CreateOptions,
) -> Result<WorkflowResult> {
    let mut result = WorkflowResult::default();
    if options.check && object.kind.is_activatable() {
        result.check = check_stored(client, object).await?;
    }
    if options.activate && object.kind.is_activatable() {
        result.activation = Some(activate(client, object).await?);
    }
    Ok(result)
}

/// Check the inactive version; error messages fail the chain.
///
/// `None` when the backend has no check for the object type.
pub(crate) async fn check_stored(
    client: &ObjectClient,
    object: &ObjectRef,
) -> Result<Option<CheckReport>> {
    let check = client
        .check(&[CheckObject::stored(&object.uri, Version::Inactive)])
        .await;
    let report = skip_unsupported(object, check)?;
    if let Some(report) = &report {
        fail_on_errors(report)?;
    }
    Ok(report)
}

/// A check the backend does not support is skipped, not failed.
fn skip_unsupported(
    object: &ObjectRef,
    check: Result<CheckReport>,
) -> Result<Option<CheckReport>> {
    match check {
        Ok(report) => Ok(Some(report)),
        Err(err) if err.is_not_supported() => {
            debug!(uri = %object.uri, error = %err, "Check not supported, skipping");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Activate; an unsuccessful activation fails the chain.
pub(crate) async fn activate(client: &ObjectClient, object: &ObjectRef) -> Result<ActivationResult> {
    let activation = client.activate(object).await?;
    if !activation.success {
        return Err(Error::new(ErrorKind::ActivationFailed {
            messages: activation.errors(),
        }));
    }
    Ok(activation)
}

fn fail_on_errors(report: &CheckReport) -> Result<()> {
    if report.has_errors() {
        return Err(Error::new(ErrorKind::CheckFailed {
            messages: report.errors(),
        }));
    }
    Ok(())
}

/// Release a lock after a failed step. Errors are logged, never returned.
pub(crate) async fn force_unlock(client: &ObjectClient, object: &ObjectRef, lock_handle: &str) {
    if let Err(err) = client.unlock(object, lock_handle).await {
        warn!(uri = %object.uri, error = %err, "Failed to release lock after error");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::{connection, LOCK_RESPONSE};
    use crate::object_kind::ObjectKind;
    use abap_adt_client::SessionType;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PROGRAM: &str = "/sap/bc/adt/programs/programs/zdemo";
    const CHECK_ERRORS: &str = r#"<chkrun:checkRunReports xmlns:chkrun="http://www.sap.com/adt/checkrun">
      <chkrun:checkReport chkrun:reporter="abapCheckRun" chkrun:triggeringUri="/sap/bc/adt/programs/programs/zdemo" chkrun:status="processed" chkrun:statusText="">
        <chkrun:checkMessageList>
          <chkrun:checkMessage chkrun:uri="/sap/bc/adt/programs/programs/zdemo/source/main#start=1,0" chkrun:type="E" chkrun:shortText="REPORT expected"/>
        </chkrun:checkMessageList>
      </chkrun:checkReport>
    </chkrun:checkRunReports>"#;

    fn program() -> ObjectRef {
        ObjectRef::new(ObjectKind::Program, "ZDEMO").unwrap()
    }

    fn source() -> Vec<UpdatePayload> {
        vec![UpdatePayload::source(
            format!("{PROGRAM}/source/main"),
            "REPORT zdemo.",
        )]
    }

    async fn mount_lock(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path(PROGRAM))
            .and(query_param("_action", "LOCK"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LOCK_RESPONSE))
            .expect(1)
            .mount(server)
            .await;
    }

    async fn mount_unlock(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path(PROGRAM))
            .and(query_param("_action", "UNLOCK"))
            .and(query_param("lockHandle", "LH-4711"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(server)
            .await;
    }

    async fn mount_clean_check_and_activation(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/sap/bc/adt/checkruns"))
            .respond_with(ResponseTemplate::new(200))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/sap/bc/adt/activation"))
            .respond_with(ResponseTemplate::new(200))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_update_chain_uses_lock_transport() {
        let server = MockServer::start().await;
        mount_lock(&server).await;
        mount_unlock(&server).await;
        mount_clean_check_and_activation(&server).await;
        Mock::given(method("PUT"))
            .and(path(format!("{PROGRAM}/source/main")))
            .and(query_param("lockHandle", "LH-4711"))
            .and(query_param("corrNr", "DEVK900123"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = ObjectClient::new(connection(&server).await);
        let result = lock_and_update(&client, &program(), &source(), None, UpdateOptions::default())
            .await
            .unwrap();

        assert!(result.updated);
        assert_eq!(result.lock.unwrap().lock_handle, "LH-4711");
        assert!(result.check.is_some());
        assert!(result.activation.unwrap().success);
        assert_eq!(client.connection().session_type(), SessionType::Stateless);
    }

    #[tokio::test]
    async fn test_failed_update_still_unlocks() {
        let server = MockServer::start().await;
        mount_lock(&server).await;
        mount_unlock(&server).await;
        Mock::given(method("PUT"))
            .and(path(format!("{PROGRAM}/source/main")))
            .respond_with(ResponseTemplate::new(500).set_body_string("dump"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/sap/bc/adt/activation"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = ObjectClient::new(connection(&server).await);
        let err = lock_and_update(&client, &program(), &source(), Some("DEVK900999"), UpdateOptions::default())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(client.connection().session_type(), SessionType::Stateless);
    }

    #[tokio::test]
    async fn test_failed_pre_check_unlocks_without_writing() {
        let server = MockServer::start().await;
        mount_lock(&server).await;
        mount_unlock(&server).await;
        Mock::given(method("POST"))
            .and(path("/sap/bc/adt/checkruns"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CHECK_ERRORS))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = ObjectClient::new(connection(&server).await);
        let options = UpdateOptions {
            check_before_update: true,
            ..Default::default()
        };
        let err = lock_and_update(&client, &program(), &source(), None, options)
            .await
            .unwrap_err();

        match err.kind {
            ErrorKind::CheckFailed { messages } => {
                assert_eq!(messages.len(), 1);
                assert_eq!(messages[0].text, "REPORT expected");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_lock_failure_skips_everything() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PROGRAM))
            .and(query_param("_action", "LOCK"))
            .respond_with(ResponseTemplate::new(403).set_body_string("locked by OTHER"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(query_param("_action", "UNLOCK"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = ObjectClient::new(connection(&server).await);
        let err = lock_and_update(&client, &program(), &source(), None, UpdateOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err.kind, ErrorKind::LockFailed(_)));
        assert_eq!(client.connection().session_type(), SessionType::Stateless);
    }

    #[tokio::test]
    async fn test_activation_errors_fail_chain() {
        let server = MockServer::start().await;
        mount_lock(&server).await;
        mount_unlock(&server).await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/sap/bc/adt/activation"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<chkl:messages xmlns:chkl="http://www.sap.com/abapxml/checklist">
                     <msg type="E"><shortText><txt>Syntax error</txt></shortText></msg>
                   </chkl:messages>"#,
            ))
            .mount(&server)
            .await;

        let client = ObjectClient::new(connection(&server).await);
        let options = UpdateOptions {
            check_after_unlock: false,
            ..Default::default()
        };
        let err = lock_and_update(&client, &program(), &source(), None, options)
            .await
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ActivationFailed { ref messages } if messages.len() == 1));
    }

    #[tokio::test]
    async fn test_create_deletes_on_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sap/bc/adt/programs/programs"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        mount_lock(&server).await;
        mount_unlock(&server).await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/sap/bc/adt/deletion/delete"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = ObjectClient::new(connection(&server).await);
        let options = CreateOptions {
            delete_on_failure: true,
            ..Default::default()
        };
        let err = create_and_update(&client, &program(), "<program/>".into(), &source(), None, options)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_create_without_payloads_activates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sap/bc/adt/programs/programs"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;
        mount_clean_check_and_activation(&server).await;

        let client = ObjectClient::new(connection(&server).await);
        let result = create_and_update(
            &client,
            &program(),
            "<program/>".into(),
            &[],
            None,
            CreateOptions::default(),
        )
        .await
        .unwrap();
        assert!(result.created);
        assert!(result.lock.is_none());
        assert!(result.activation.is_some());
    }

    const NOT_SUPPORTED: &str = r#"<exc:exception xmlns:exc="http://www.sap.com/abapxml/types/communicationframework">
      <namespace id="com.sap.adt"/>
      <type id="ExceptionNotSupported"/>
      <message lang="EN">Check for object type SRVD is not supported</message>
    </exc:exception>"#;

    #[tokio::test]
    async fn test_unsupported_check_is_skipped() {
        let server = MockServer::start().await;
        let uri = "/sap/bc/adt/ddic/srvd/sources/zui_demo";
        Mock::given(method("POST"))
            .and(path(uri))
            .and(query_param("_action", "LOCK"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LOCK_RESPONSE))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(format!("{uri}/source/main")))
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
            .respond_with(ResponseTemplate::new(400).set_body_string(NOT_SUPPORTED))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/sap/bc/adt/activation"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = ObjectClient::new(connection(&server).await);
        let object = ObjectRef::new(ObjectKind::ServiceDefinition, "ZUI_DEMO").unwrap();
        let payloads = vec![UpdatePayload::source(
            object.source_uri(),
            "define service ZUI_DEMO { expose ZI_DEMO; }",
        )];
        let options = UpdateOptions {
            check_before_update: true,
            ..Default::default()
        };
        let result = lock_and_update(&client, &object, &payloads, None, options)
            .await
            .unwrap();

        assert!(result.updated);
        assert!(result.check.is_none());
        assert!(result.activation.unwrap().success);
    }

    #[tokio::test]
    async fn test_other_check_failures_still_fail() {
        let server = MockServer::start().await;
        mount_lock(&server).await;
        mount_unlock(&server).await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/sap/bc/adt/checkruns"))
            .respond_with(ResponseTemplate::new(500).set_body_string("dump"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/sap/bc/adt/activation"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = ObjectClient::new(connection(&server).await);
        let err = lock_and_update(&client, &program(), &source(), None, UpdateOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
    }
}
