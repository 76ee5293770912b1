//! # adt-ws
//!
//! JSON request/response RPC over an ADT WebSocket connection.
//!
//! [`WsRpcClient`] does not open sockets itself: it takes any sink of text
//! frames and any stream of incoming text frames, so it works with whichever
//! WebSocket library the application uses. [`DebuggerSessionClient`] layers
//! typed debugger operations on top.
//!
//! ## Envelopes
//!
//! ```text
//! request   { "id", "type": "request",  "operation", "params" }
//! response  { "id", "type": "response", "result" }
//! error     { "id", "type": "error",    "error": { "message", "code" } }
//! event     { "type": "event", ... }
//! ```

mod client;
mod debugger;
mod envelope;
mod error;

pub use client::{WsClientConfig, WsRpcClient};
pub use debugger::{
    AttachRequest, AttachResult, Breakpoint, BreakpointResult, DebuggerSessionClient, StackFrame,
    StepKind, StepResult, Variable,
};
pub use envelope::{Envelope, RemoteError, WsEvent};
pub use error::{Error, ErrorKind, Result};
