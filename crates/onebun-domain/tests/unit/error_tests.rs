//! Error Tests

use onebun_domain::error::Error;

#[test]
fn test_missing_decorator_message() {
    let err = Error::missing_decorator("UserService", "Service");
    assert_eq!(err.to_string(), "Class UserService is missing @Service metadata");
}

#[test]
fn test_cyclic_import_message_joins_path() {
    let err = Error::CyclicImport {
        path: vec!["AppModule".into(), "UserModule".into(), "AppModule".into()],
    };
    assert_eq!(
        err.to_string(),
        "Cyclic module import: AppModule -> UserModule -> AppModule"
    );
}

#[test]
fn test_unresolved_dependencies_message() {
    let err = Error::UnresolvedDependencies {
        class: "UserController".into(),
        params: vec!["cache: CacheService".into()],
    };
    assert!(err.to_string().contains("UserController"));
    assert!(err.to_string().contains("cache: CacheService"));
}

#[test]
fn test_io_error_conversion_keeps_source() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing file");
    let err: Error = io.into();
    assert!(matches!(err, Error::Io { source: Some(_), .. }));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_construction_with_source() {
    let io = std::io::Error::other("boom");
    let err = Error::construction_with_source("Plain", "constructor failed", io);
    assert_eq!(err.to_string(), "Failed to construct Plain: constructor failed");
}

#[test]
fn test_effect_with_source_accepts_boxed_errors() {
    let boxed: Box<dyn std::error::Error + Send + Sync> = "queue closed".into();
    let err = Error::effect_with_source("queue closed", boxed);
    assert_eq!(err.to_string(), "Effect failed: queue closed");
    assert!(std::error::Error::source(&err).is_some());

    let io = std::io::Error::other("disk full");
    let err = Error::effect_with_source("disk full", io);
    let source = std::error::Error::source(&err).expect("source");
    assert!(source.downcast_ref::<std::io::Error>().is_some());
}
