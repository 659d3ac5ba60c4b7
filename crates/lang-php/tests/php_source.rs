use annoscan_core::error::ScanError;
use annoscan_core::source::ClassSource;
use annoscan_core::{Orchestrator, ScanConfig};
use annoscan_php::PhpClassSource;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

const USER_CONTROLLER: &str = r#"<?php namespace App\Http\Controllers;

/**
 * @Middleware("auth", except={"index"})
 * @Prefix("/api")
 */
class UserController extends Controller {

    /**
     * Lists users.
     *
     * @Get("/users", as="users.index")
     */
    public function index() {}

    /**
     * @Put("/users/{id}")
     * @Patch("/users/{id}")
     * @Where({"id": "[0-9]+"})
     */
    public function update($id) {}

    protected function authorizeUser() {}
}
"#;

const USER_HANDLER: &str = r#"<?php
namespace App\Handlers\Events;

class UserHandler
{
    /**
     * @Hears({"UserCreated", "UserUpdated"})
     */
    public function handle($event) {}
}
"#;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

#[test]
fn test_resolves_class_from_psr4_path() {
    let dir = tempdir().unwrap();
    write(dir.path(), "Http/Controllers/UserController.php", USER_CONTROLLER);

    let source = PhpClassSource::new(dir.path(), "App").unwrap();
    let decl = source.resolve("\\App\\Http\\Controllers\\UserController").unwrap();

    assert_eq!(decl.name, "App\\Http\\Controllers\\UserController");
    let methods: Vec<_> = decl.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(methods, vec!["index", "update", "authorizeUser"]);
    assert_eq!(
        decl.origin.as_deref(),
        Some(dir.path().join("Http/Controllers/UserController.php").as_path())
    );
}

#[test]
fn test_missing_file_is_resolution_error() {
    let dir = tempdir().unwrap();
    let source = PhpClassSource::new(dir.path(), "App").unwrap();

    let err = source.resolve("App\\Http\\Controllers\\Nope").unwrap_err();
    assert!(matches!(err, ScanError::ClassResolution { .. }));
}

#[test]
fn test_file_declaring_other_class_is_resolution_error() {
    let dir = tempdir().unwrap();
    write(dir.path(), "Http/Controllers/Renamed.php", USER_CONTROLLER);

    let source = PhpClassSource::new(dir.path(), "App").unwrap();
    let err = source.resolve("App\\Http\\Controllers\\Renamed").unwrap_err();
    assert!(err.to_string().contains("does not declare it"));
}

#[test]
fn test_scan_php_application() {
    let dir = tempdir().unwrap();
    let app = dir.path().join("app");
    write(&app, "Http/Controllers/UserController.php", USER_CONTROLLER);
    write(&app, "Handlers/Events/UserHandler.php", USER_HANDLER);
    fs::write(
        dir.path().join("annoscan.toml"),
        r#"
[routes]
scan_controllers = true
classes = ["App\\Http\\Controllers\\GoneController"]

[events]
namespaces = ["App\\Handlers\\Events"]
"#,
    )
    .unwrap();

    let config = ScanConfig::load(&dir.path().join("annoscan.toml")).unwrap();
    let source = Arc::new(PhpClassSource::new(&config.app_path, &config.root_namespace).unwrap());
    let orchestrator = Orchestrator::new(config, source);

    let routes = fs::read_to_string(orchestrator.scan_routes().unwrap()).unwrap();
    let expected_routes = r#"<?php

$router->get('/api/users', [
	'uses' => 'App\\Http\\Controllers\\UserController@index',
	'as' => 'users.index',
]);

$router->put('/api/users/{id}', [
	'uses' => 'App\\Http\\Controllers\\UserController@update',
	'middleware' => ['auth'],
	'where' => ['id' => '[0-9]+'],
]);

$router->patch('/api/users/{id}', [
	'uses' => 'App\\Http\\Controllers\\UserController@update',
	'middleware' => ['auth'],
	'where' => ['id' => '[0-9]+'],
]);
"#;
    assert_eq!(routes, expected_routes);

    let events = fs::read_to_string(orchestrator.scan_events().unwrap()).unwrap();
    assert_eq!(
        events,
        "<?php\n\n$events->listen(array('UserCreated','UserUpdated'), 'App\\\\Handlers\\\\Events\\\\UserHandler@handle');\n"
    );
    assert!(dir.path().join("storage/framework/events.scanned.php").exists());
}
