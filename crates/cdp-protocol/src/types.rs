//! Protocol value types consumed by the connection core.

use serde::{Deserialize, Serialize};

/// Target info from the Target domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInfo {
    pub target_id: String,
    #[serde(rename = "type")]
    pub target_type: String,
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attached: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_context_id: Option<String>,
}

/// Parameters of the `Target.attachedToTarget` notification.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachedToTargetParams {
    /// Identifier assigned to the session used to send/receive messages.
    pub session_id: String,
    pub target_info: TargetInfo,
    #[serde(default)]
    pub waiting_for_debugger: bool,
}

/// Parameters of the `Target.detachedFromTarget` notification.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetachedFromTargetParams {
    pub session_id: String,
    pub target_id: Option<String>,
}

/// Page info from the HTTP `/json` endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub id: String,
    #[serde(rename = "type")]
    pub page_type: String,
    pub title: String,
    pub url: String,
    pub web_socket_debugger_url: Option<String>,
    pub dev_tools_frontend_url: Option<String>,
}

/// Browser version info from `/json/version`.
///
/// Note: Chrome returns PascalCase field names for this endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserVersion {
    #[serde(rename = "Browser")]
    pub browser: String,
    #[serde(rename = "Protocol-Version")]
    pub protocol_version: String,
    #[serde(rename = "User-Agent")]
    pub user_agent: String,
    #[serde(rename = "V8-Version")]
    pub v8_version: Option<String>,
    #[serde(rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: String,
}

/// Single GPU descriptor from the SystemInfo domain.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpuDevice {
    /// PCI ID of the GPU vendor, if available; 0 otherwise.
    pub vendor_id: f64,
    /// PCI ID of the GPU device, if available; 0 otherwise.
    pub device_id: f64,
    pub vendor_string: String,
    pub device_string: String,
}

/// GPU information from `SystemInfo.getInfo`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpuInfo {
    pub devices: Vec<GpuDevice>,
    pub driver_bug_workarounds: Vec<String>,
    #[serde(default)]
    pub aux_attributes: Option<serde_json::Value>,
    #[serde(default)]
    pub feature_status: Option<serde_json::Value>,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
