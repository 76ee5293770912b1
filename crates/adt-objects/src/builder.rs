//! Step-by-step object chains.
//!
//! A builder runs the same verbs as [`Adt::create`](crate::Adt::create) and
//! [`Adt::update`](crate::Adt::update), one call per step, and keeps every
//! intermediate result in a [`BuilderState`]:
//!
//! ```rust,ignore
//! let mut builder = DataElementBuilder::new(conn, config)?;
//! builder.validate().await?.create().await?.lock().await?;
//! builder.update().await?.unlock().await?.activate().await?;
//! println!("{:?}", builder.state());
//! ```
//!
//! A failing step is recorded in [`BuilderState::errors`]. When the failure
//! happens while a lock is held, the lock is released before the error is
//! returned.

use std::fmt;

use abap_adt_client::AdtConnection;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::client::ObjectClient;
use crate::error::{Error, ErrorKind, Result};
use crate::object_kind::ObjectRef;
use crate::objects::class::ClassSpec;
use crate::objects::data_element::DataElementSpec;
use crate::objects::domain::DomainSpec;
use crate::objects::{ObjectConfig, ObjectSpec};
use crate::types::{
    ActivationResult, CheckReport, LockResult, UpdateOptions, ValidationResult,
};
use crate::workflow;

pub type DataElementBuilder = ObjectBuilder<DataElementSpec>;
pub type DomainBuilder = ObjectBuilder<DomainSpec>;
pub type ClassBuilder = ObjectBuilder<ClassSpec>;

/// One step of a builder chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuilderStep {
    Validate,
    Create,
    Lock,
    Update,
    Check,
    Unlock,
    Activate,
}

impl fmt::Display for BuilderStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuilderStep::Validate => "validate",
            BuilderStep::Create => "create",
            BuilderStep::Lock => "lock",
            BuilderStep::Update => "update",
            BuilderStep::Check => "check",
            BuilderStep::Unlock => "unlock",
            BuilderStep::Activate => "activate",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepError {
    pub step: BuilderStep,
    pub message: String,
}

/// Results accumulated by the steps run so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuilderState {
    pub validation: Option<ValidationResult>,
    pub created: bool,
    /// The lock currently held, if any.
    pub lock: Option<LockResult>,
    pub updated: bool,
    pub check: Option<CheckReport>,
    pub activation: Option<ActivationResult>,
    pub errors: Vec<StepError>,
}

/// Fluent chain over one object of kind `S`.
pub struct ObjectBuilder<S: ObjectSpec> {
    client: ObjectClient,
    spec: S,
    config: S::Config,
    object: ObjectRef,
    state: BuilderState,
}

impl<S: ObjectSpec + Default> ObjectBuilder<S> {
    pub fn new(conn: AdtConnection, config: S::Config) -> Result<Self> {
        Self::with_spec(conn, S::default(), config)
    }
}

impl<S: ObjectSpec> ObjectBuilder<S> {
    pub fn with_spec(conn: AdtConnection, spec: S, config: S::Config) -> Result<Self> {
        let object = spec.object_ref(&config.header().name)?;
        Ok(Self {
            client: ObjectClient::new(conn),
            spec,
            config,
            object,
            state: BuilderState::default(),
        })
    }

    pub fn object(&self) -> &ObjectRef {
        &self.object
    }

    pub fn config(&self) -> &S::Config {
        &self.config
    }

    /// Change the content written by the next [`update`](Self::update).
    pub fn config_mut(&mut self) -> &mut S::Config {
        &mut self.config
    }

    pub fn state(&self) -> &BuilderState {
        &self.state
    }

    pub fn into_state(self) -> BuilderState {
        self.state
    }

    /// Validate the config locally, then ask the backend.
    ///
    /// An `ERROR` severity from the backend fails the step.
    #[instrument(skip(self), fields(uri = %self.object.uri))]
    pub async fn validate(&mut self) -> Result<&mut Self> {
        let outcome = self.run_validate().await;
        self.finish(BuilderStep::Validate, outcome).await
    }

    async fn run_validate(&mut self) -> Result<()> {
        self.config.validate()?;
        let header = self.config.header();
        let result = self
            .client
            .validate(&self.object, &header.package, &header.description)
            .await?;
        let failed = result.severity.trim().eq_ignore_ascii_case("error");
        let text = result.short_text.clone();
        self.state.validation = Some(result);
        if failed {
            return Err(Error::new(ErrorKind::InvalidConfig(text)));
        }
        Ok(())
    }

    #[instrument(skip(self), fields(uri = %self.object.uri))]
    pub async fn create(&mut self) -> Result<&mut Self> {
        let outcome = self.run_create().await;
        self.finish(BuilderStep::Create, outcome).await
    }

    async fn run_create(&mut self) -> Result<()> {
        self.config.validate()?;
        let body = self.spec.create_body(&self.config)?;
        self.client
            .create(&self.object, body, self.transport())
            .await?;
        self.state.created = true;
        Ok(())
    }

    #[instrument(skip(self), fields(uri = %self.object.uri))]
    pub async fn lock(&mut self) -> Result<&mut Self> {
        let outcome = self.run_lock().await;
        self.finish(BuilderStep::Lock, outcome).await
    }

    async fn run_lock(&mut self) -> Result<()> {
        if self.state.lock.is_some() {
            return Ok(());
        }
        let lock = self.client.lock(&self.object).await?;
        self.state.lock = Some(lock);
        Ok(())
    }

    /// Write the config's content under the held lock.
    #[instrument(skip(self), fields(uri = %self.object.uri))]
    pub async fn update(&mut self) -> Result<&mut Self> {
        let outcome = self.run_update().await;
        self.finish(BuilderStep::Update, outcome).await
    }

    async fn run_update(&mut self) -> Result<()> {
        let Some(lock) = self.state.lock.clone() else {
            return Err(Error::new(ErrorKind::InvalidConfig(
                "update requires a held lock".to_string(),
            )));
        };
        let payloads = self.spec.update_payloads(&self.object, &self.config)?;
        let options = UpdateOptions {
            check_before_update: false,
            ..Default::default()
        };
        workflow::write_locked(
            &self.client,
            &self.object,
            &payloads,
            self.transport(),
            &lock,
            options,
        )
        .await?;
        self.state.updated = true;
        Ok(())
    }

    /// Check the inactive version; error messages fail the step.
    #[instrument(skip(self), fields(uri = %self.object.uri))]
    pub async fn check(&mut self) -> Result<&mut Self> {
        let outcome = self.run_check().await;
        self.finish(BuilderStep::Check, outcome).await
    }

    async fn run_check(&mut self) -> Result<()> {
        if !self.object.kind.is_activatable() {
            return Ok(());
        }
        self.state.check = workflow::check_stored(&self.client, &self.object).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(uri = %self.object.uri))]
    pub async fn unlock(&mut self) -> Result<&mut Self> {
        let outcome = self.run_unlock().await;
        self.finish(BuilderStep::Unlock, outcome).await
    }

    async fn run_unlock(&mut self) -> Result<()> {
        let Some(lock) = self.state.lock.take() else {
            return Ok(());
        };
        self.client.unlock(&self.object, &lock.lock_handle).await
    }

    #[instrument(skip(self), fields(uri = %self.object.uri))]
    pub async fn activate(&mut self) -> Result<&mut Self> {
        let outcome = self.run_activate().await;
        self.finish(BuilderStep::Activate, outcome).await
    }

    async fn run_activate(&mut self) -> Result<()> {
        if !self.object.kind.is_activatable() {
            return Ok(());
        }
        if self.state.lock.is_some() {
            return Err(Error::new(ErrorKind::InvalidConfig(
                "unlock before activating".to_string(),
            )));
        }
        let activation = self.client.activate(&self.object).await?;
        let success = activation.success;
        let messages = activation.errors();
        self.state.activation = Some(activation);
        if !success {
            return Err(Error::new(ErrorKind::ActivationFailed { messages }));
        }
        Ok(())
    }

    /// Release a held lock, ignoring backend errors.
    pub async fn force_unlock(&mut self) -> &mut Self {
        if let Some(lock) = self.state.lock.take() {
            workflow::force_unlock(&self.client, &self.object, &lock.lock_handle).await;
        }
        self
    }

    fn transport(&self) -> Option<&str> {
        self.config.header().transport.as_deref()
    }

    async fn finish(&mut self, step: BuilderStep, outcome: Result<()>) -> Result<&mut Self> {
        match outcome {
            Ok(()) => {
                debug!(%step, "Builder step done");
                Ok(self)
            }
            Err(err) => {
                warn!(%step, error = %err, "Builder step failed");
                self.state.errors.push(StepError {
                    step,
                    message: err.to_string(),
                });
                self.force_unlock().await;
                Err(err)
            }
        }
    }
}
