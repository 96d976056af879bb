//! # CDP Protocol
//!
//! Wire-level types for the Chrome DevTools Protocol: the JSON envelopes
//! exchanged over the debugging WebSocket, the value types the client core
//! consumes, and a static schema table describing domain commands and events.
//!
//! This crate contains no I/O. The connection core lives in `cdp-client`.
//!
//! ## Modules
//!
//! - [`envelope`] - Outbound command and inbound reply/event envelopes
//! - [`types`] - Protocol value types (targets, browser info, GPU info)
//! - [`decode`] - Tagged typed decoding of raw JSON payloads
//! - [`domains`] - Static domain/command/event schema table

pub mod decode;
pub mod domains;
pub mod envelope;
pub mod types;

pub use decode::Decoded;
pub use domains::{CommandSpec, DomainSpec, ParamSpec, SchemaError};
pub use envelope::{CdpErrorResponse, CdpRequest, CdpResponse, MessageKind};
pub use types::{
    AttachedToTargetParams, BrowserVersion, DetachedFromTargetParams, GpuDevice, GpuInfo,
    PageInfo, TargetInfo,
};
