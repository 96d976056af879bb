use super::*;
use serde_json::json;

#[test]
fn test_domain_lookup() {
    assert!(domain("Page").is_some());
    assert!(domain("Target").is_some());
    assert!(domain("NoSuchDomain").is_none());
}

#[test]
fn test_command_lookup() {
    let spec = command("Page.navigate").unwrap();
    assert_eq!(spec.method, "Page.navigate");
    assert!(spec.params.iter().any(|p| p.name == "url" && p.required));

    assert!(command("Page.noSuchCommand").is_none());
    assert!(command("navigate").is_none());
}

#[test]
fn test_known_event() {
    assert!(is_known_event("Target.attachedToTarget"));
    assert!(is_known_event("Database.addDatabase"));
    assert!(!is_known_event("Target.noSuchEvent"));
    assert!(!is_known_event("bare-name"));
}

#[test]
fn test_build_params_filters_optionals() {
    let spec = command("Page.navigate").unwrap();
    let params = spec
        .build_params(&[
            ("url", Some(json!("https://example.com"))),
            ("referrer", None),
        ])
        .unwrap();
    assert_eq!(params.len(), 1);
    assert_eq!(params["url"], "https://example.com");
}

#[test]
fn test_build_params_missing_required() {
    let spec = command("Page.navigate").unwrap();
    let err = spec.build_params(&[("referrer", Some(json!("x")))]).unwrap_err();
    match err {
        SchemaError::MissingParam { method, name } => {
            assert_eq!(method, "Page.navigate");
            assert_eq!(name, "url");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_build_params_unknown_name() {
    let spec = command("Page.enable").unwrap();
    let err = spec.build_params(&[("bogus", Some(json!(1)))]).unwrap_err();
    assert!(matches!(err, SchemaError::UnknownParam { .. }));
}

#[test]
fn test_required_none_is_missing() {
    let spec = command("DOM.querySelector").unwrap();
    let err = spec
        .build_params(&[("nodeId", Some(json!(1))), ("selector", None)])
        .unwrap_err();
    assert!(matches!(err, SchemaError::MissingParam { name, .. } if name == "selector"));
}

#[test]
fn test_single_definition_per_type() {
    // Each method appears exactly once across the whole table.
    let mut seen = std::collections::HashSet::new();
    for domain in DOMAINS {
        for command in domain.commands {
            assert!(seen.insert(command.method), "duplicate: {}", command.method);
        }
    }
}
