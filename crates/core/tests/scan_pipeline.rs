use annoscan_core::annotation::{AnnotationRegistry, MetadataReader};
use annoscan_core::discovery::{ClassDiscovery, NamespaceScan, resolve_classes};
use annoscan_core::emitter;
use annoscan_core::model::ClassDecl;
use annoscan_core::resolver::{EventResolver, RouteResolver};
use annoscan_core::source::InMemoryClassSource;
use annoscan_core::{Orchestrator, ScanConfig};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "<?php\n").unwrap();
}

fn controllers() -> InMemoryClassSource {
    InMemoryClassSource::new()
        .with(
            ClassDecl::new("App\\Http\\Controllers\\PostController")
                .with_doc("/**\n * @Controller(prefix=\"/blog\")\n * @Middleware(\"web\")\n */")
                .with_method("index", Some("/** @Get(\"/\", as=\"posts\") */"))
                .with_method("show", Some("/** @Get(\"/{slug}\") @Where(slug=\"[a-z-]+\") */")),
        )
        .with(
            ClassDecl::new("App\\Http\\Controllers\\StatusController")
                .with_method("ping", Some("/** @Any(\"/ping\") */")),
        )
}

#[test]
fn test_discovery_then_resolution_keeps_order() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "Http/Controllers/StatusController.php");
    touch(dir.path(), "Http/Controllers/PostController.php");
    touch(dir.path(), "Http/Controllers/LegacyController.php");

    let discovery = ClassDiscovery::new(dir.path(), "App", "php");
    let identifiers = discovery
        .identifiers(
            &["App\\Http\\Controllers\\StatusController".to_string()],
            &NamespaceScan::new(&["App\\Http\\Controllers"])
                .except(&["App\\Http\\Controllers\\StatusController"]),
        )
        .unwrap();

    // LegacyController is listed but the source cannot resolve it.
    let discovered = resolve_classes(&controllers(), &identifiers);
    assert_eq!(
        discovered.class_names(),
        vec![
            "App\\Http\\Controllers\\StatusController",
            "App\\Http\\Controllers\\PostController",
        ]
    );
    assert_eq!(discovered.skipped.len(), 1);
    assert_eq!(discovered.skipped[0].class, "App\\Http\\Controllers\\LegacyController");

    let endpoints = RouteResolver::new(MetadataReader::new(AnnotationRegistry::routing()))
        .endpoints(&discovered.classes)
        .unwrap();
    let summary: Vec<_> = endpoints
        .iter()
        .map(|r| format!("{} {}", r.verb_label(), r.path))
        .collect();
    assert_eq!(summary, vec!["ANY /ping", "GET /blog", "GET /blog/{slug}"]);

    let definitions = emitter::route_definitions(&endpoints);
    assert!(definitions.starts_with("$router->any('/ping', ["));
    assert!(definitions.contains("\t'as' => 'posts',\n\t'middleware' => ['web'],\n"));
    assert!(definitions.contains("\t'where' => ['slug' => '[a-z-]+'],\n"));
}

#[test]
fn test_event_pipeline_matches_registration_format() {
    let source = InMemoryClassSource::new().with(
        ClassDecl::new("Class").with_method(
            "method",
            Some("/** @Hears(events={\"UserCreated\",\"UserUpdated\"}) */"),
        ),
    );
    let discovered = resolve_classes(&source, &["Class".to_string()]);

    let listeners = EventResolver::new(MetadataReader::new(AnnotationRegistry::events()))
        .listeners(&discovered.classes)
        .unwrap();

    assert_eq!(
        emitter::event_definitions(&listeners),
        "$events->listen(array('UserCreated','UserUpdated'), 'Class@method');"
    );
}

#[test]
fn test_full_scan_is_idempotent() {
    let dir = tempdir().unwrap();
    let mut config = ScanConfig::default().resolved_against(dir.path());
    config.routes.targets.prefix = Some("App\\Http\\Controllers".to_string());
    config.routes.targets.classes = vec![
        "PostController".to_string(),
        "StatusController".to_string(),
    ];

    let orchestrator = Orchestrator::new(config, Arc::new(controllers()));
    let first = fs::read_to_string(orchestrator.scan_routes().unwrap()).unwrap();
    let second = fs::read_to_string(orchestrator.scan_routes().unwrap()).unwrap();

    assert_eq!(first, second);
    assert!(first.starts_with("<?php\n\n$router->get('/blog', ["));
    assert!(first.ends_with("]);\n"));
}
