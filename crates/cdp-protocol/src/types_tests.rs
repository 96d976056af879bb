use super::*;

#[test]
fn test_target_info_deserialize() {
    let json = r#"{
        "targetId": "T1",
        "type": "page",
        "title": "Example",
        "url": "https://example.com",
        "attached": true
    }"#;
    let info: TargetInfo = serde_json::from_str(json).unwrap();
    assert_eq!(info.target_id, "T1");
    assert_eq!(info.target_type, "page");
    assert_eq!(info.attached, Some(true));
    assert!(info.browser_context_id.is_none());
}

#[test]
fn test_attached_params_deserialize() {
    let json = r#"{
        "sessionId": "S1",
        "targetInfo": {"targetId": "T1", "type": "page", "title": "", "url": "about:blank"},
        "waitingForDebugger": false
    }"#;
    let params: AttachedToTargetParams = serde_json::from_str(json).unwrap();
    assert_eq!(params.session_id, "S1");
    assert_eq!(params.target_info.target_id, "T1");
    assert!(!params.waiting_for_debugger);
}

#[test]
fn test_detached_params_target_id_optional() {
    let params: DetachedFromTargetParams =
        serde_json::from_str(r#"{"sessionId": "S1"}"#).unwrap();
    assert_eq!(params.session_id, "S1");
    assert!(params.target_id.is_none());
}

#[test]
fn test_page_info_deserialize() {
    let json = r#"{
        "id": "page123",
        "type": "page",
        "title": "Test",
        "url": "https://example.com",
        "webSocketDebuggerUrl": "ws://localhost:9222/devtools/page/page123"
    }"#;
    let info: PageInfo = serde_json::from_str(json).unwrap();
    assert_eq!(info.id, "page123");
    assert_eq!(info.page_type, "page");
    assert!(info.dev_tools_frontend_url.is_none());
}

#[test]
fn test_browser_version_pascal_case() {
    let json = r#"{
        "Browser": "Chrome/120.0.0.0",
        "Protocol-Version": "1.3",
        "User-Agent": "Mozilla/5.0",
        "V8-Version": "12.0",
        "webSocketDebuggerUrl": "ws://localhost:9222/devtools/browser/xyz"
    }"#;
    let version: BrowserVersion = serde_json::from_str(json).unwrap();
    assert_eq!(version.browser, "Chrome/120.0.0.0");
    assert_eq!(version.protocol_version, "1.3");
    assert!(version.web_socket_debugger_url.ends_with("/xyz"));
}

#[test]
fn test_gpu_info_deserialize() {
    let json = r#"{
        "devices": [
            {"vendorId": 4318.0, "deviceId": 0.0, "vendorString": "NVIDIA", "deviceString": "RTX"}
        ],
        "driverBugWorkarounds": ["clamp_msaa_samples"]
    }"#;
    let info: GpuInfo = serde_json::from_str(json).unwrap();
    assert_eq!(info.devices.len(), 1);
    assert_eq!(info.devices[0].vendor_string, "NVIDIA");
    assert_eq!(info.driver_bug_workarounds, vec!["clamp_msaa_samples"]);
    assert!(info.aux_attributes.is_none());
}
