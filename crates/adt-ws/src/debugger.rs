//! ABAP debugger session over [`WsRpcClient`].

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument};

use crate::client::WsRpcClient;
use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachRequest {
    pub debuggee_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminal_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ide_id: Option<String>,
}

impl AttachRequest {
    pub fn new(debuggee_id: impl Into<String>) -> Self {
        Self {
            debuggee_id: debuggee_id.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachResult {
    pub session_id: String,
    #[serde(default)]
    pub process_id: Option<String>,
    #[serde(default)]
    pub is_stepping_possible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackFrame {
    pub index: u32,
    pub program: String,
    #[serde(default)]
    pub include: Option<String>,
    pub line: u32,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(rename = "type", default)]
    pub type_name: String,
    #[serde(default)]
    pub meta_type: Option<String>,
    /// Structures, tables and objects can be expanded by id.
    #[serde(default)]
    pub expandable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StepKind {
    StepInto,
    StepOver,
    StepReturn,
    StepContinue,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    /// The debuggee ran to completion.
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub stack: Vec<StackFrame>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakpoint {
    pub uri: String,
    pub line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl Breakpoint {
    pub fn new(uri: impl Into<String>, line: u32) -> Self {
        Self {
            uri: uri.into(),
            line,
            condition: None,
        }
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakpointResult {
    pub id: String,
    pub uri: String,
    pub line: u32,
    /// Set when the backend rejected the breakpoint.
    #[serde(default)]
    pub error: Option<String>,
}

/// Typed debugger operations.
#[derive(Debug, Clone)]
pub struct DebuggerSessionClient {
    rpc: WsRpcClient,
}

impl DebuggerSessionClient {
    pub fn new(rpc: WsRpcClient) -> Self {
        Self { rpc }
    }

    pub fn rpc(&self) -> &WsRpcClient {
        &self.rpc
    }

    #[instrument(skip(self), fields(debuggee = %request.debuggee_id))]
    pub async fn attach(&self, request: &AttachRequest) -> Result<AttachResult> {
        let result: AttachResult = self.rpc.request_typed("debugger.attach", request).await?;
        debug!(session = %result.session_id, "Debugger attached");
        Ok(result)
    }

    pub async fn detach(&self) -> Result<()> {
        self.rpc.request("debugger.detach", json!({})).await?;
        Ok(())
    }

    pub async fn get_stack(&self) -> Result<Vec<StackFrame>> {
        self.rpc.request_typed("debugger.getStack", &json!({})).await
    }

    /// Variables by id; child ids come from expandable variables.
    pub async fn get_variables(&self, ids: &[String]) -> Result<Vec<Variable>> {
        self.rpc
            .request_typed("debugger.getVariables", &json!({ "ids": ids }))
            .await
    }

    pub async fn step(&self, kind: StepKind) -> Result<StepResult> {
        self.rpc
            .request_typed("debugger.step", &json!({ "kind": kind }))
            .await
    }

    pub async fn step_into(&self) -> Result<StepResult> {
        self.step(StepKind::StepInto).await
    }

    pub async fn step_over(&self) -> Result<StepResult> {
        self.step(StepKind::StepOver).await
    }

    pub async fn step_return(&self) -> Result<StepResult> {
        self.step(StepKind::StepReturn).await
    }

    pub async fn continue_execution(&self) -> Result<StepResult> {
        self.step(StepKind::StepContinue).await
    }

    pub async fn set_breakpoints(&self, breakpoints: &[Breakpoint]) -> Result<Vec<BreakpointResult>> {
        self.rpc
            .request_typed(
                "debugger.setBreakpoints",
                &json!({ "breakpoints": breakpoints }),
            )
            .await
    }

    pub async fn remove_breakpoints(&self, ids: &[String]) -> Result<()> {
        self.rpc
            .request("debugger.removeBreakpoints", json!({ "ids": ids }))
            .await?;
        Ok(())
    }
}
