//! Route Metadata Tests

use onebun_domain::value_objects::{HttpMethod, ParamKind, ParamMetadata, ParamValidator, RouteMetadata};

fn non_empty(value: &serde_json::Value) -> Result<(), String> {
    match value.as_str() {
        Some(s) if !s.is_empty() => Ok(()),
        _ => Err("expected a non-empty string".to_string()),
    }
}

#[test]
fn test_full_path_joins_segments() {
    let route = RouteMetadata::new(HttpMethod::Get, "/:id", "find_one");
    assert_eq!(route.full_path("/users"), "/users/:id");
    assert_eq!(route.full_path("/users/"), "/users/:id");
    assert_eq!(route.full_path(""), "/:id");

    let root = RouteMetadata::new(HttpMethod::Get, "", "index");
    assert_eq!(root.full_path(""), "/");
    assert_eq!(root.full_path("/users"), "/users");
}

#[test]
fn test_http_method_display() {
    assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    assert_eq!(serde_json::to_string(&HttpMethod::Patch).unwrap(), "\"PATCH\"");
}

#[test]
fn test_param_validator() {
    let validator = ParamValidator::new("non_empty", non_empty);
    let param = ParamMetadata::new(ParamKind::Path, "id", 0)
        .required()
        .with_validator(validator);

    assert!(param.required);
    let attached = param.validator.unwrap();
    assert_eq!(attached.name(), "non_empty");
    assert!(attached.validate(&serde_json::json!("42")).is_ok());
    assert!(attached.validate(&serde_json::json!("")).is_err());
}

#[test]
fn test_route_middleware_order() {
    let route = RouteMetadata::new(HttpMethod::Post, "/", "create")
        .with_middleware("auth")
        .with_middleware("audit");
    assert_eq!(route.middleware, vec!["auth".to_string(), "audit".to_string()]);
}
