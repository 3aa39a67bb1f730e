//! End-to-end pipeline tests: a small legacy tree on disk goes through the
//! full run and comes out renamed, namespaced, and importing.

use std::path::Path;

use psrmig::{Migration, MigrationConfig};

fn write(base: &Path, rel: &str, contents: &str) {
    let path = base.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

fn read(base: &Path, rel: &str) -> String {
    std::fs::read_to_string(base.join(rel)).unwrap()
}

fn legacy_tree(base: &Path) {
    write(base, "core/db_adapter.php", "<?php\nclass db_adapter {\n}\n");
    write(base, "core/helper.php", "<?php\nclass helper {\n}\n");
    write(
        base,
        "app/service.php",
        "<?php\nclass service extends db_adapter {\n    public function fail() {\n        throw new \\Exception('boom');\n    }\n}\n",
    );
    write(
        base,
        "views/list.phtml",
        "<ul>\n    <li><?php echo helper::render(); ?></li>\n</ul>\n",
    );
    write(base, "composer.json", "{\n    \"name\": \"acme/legacy\"\n}\n");
}

#[test]
fn test_full_run_renames_and_rewrites() {
    let dir = tempfile::tempdir().unwrap();
    legacy_tree(dir.path());

    let mut migration = Migration::new(dir.path(), MigrationConfig::with_root_namespace("Shop"));
    let report = migration.run().unwrap();

    assert_eq!(report.files_migrated, 4);
    assert_eq!(report.files_with_parse_errors, 0);

    // Folders and files now carry PSR-4 casing
    assert!(dir.path().join("Core/DbAdapter.php").is_file());
    assert!(dir.path().join("Core/Helper.php").is_file());
    assert!(dir.path().join("App/Service.php").is_file());
    assert!(dir.path().join("Views/List.phtml").is_file());
}

#[test]
fn test_full_run_injects_namespaces_and_imports() {
    let dir = tempfile::tempdir().unwrap();
    legacy_tree(dir.path());

    let mut migration = Migration::new(dir.path(), MigrationConfig::with_root_namespace("Shop"));
    migration.run().unwrap();

    let service = read(dir.path(), "App/Service.php");
    assert!(service.contains("namespace Shop\\App;"));
    assert!(service.contains("use Shop\\Core\\DbAdapter;"));
    // `\Exception` was unqualified and now resolves through an import
    assert!(service.contains("use Exception;"));
    assert!(service.contains("class Service extends DbAdapter"));
    assert!(!service.contains("\\Exception"));

    let adapter = read(dir.path(), "Core/DbAdapter.php");
    assert!(adapter.contains("namespace Shop\\Core;"));
    assert!(adapter.contains("class DbAdapter"));
    // Nothing referenced, nothing imported
    assert!(!adapter.contains("use "));
}

#[test]
fn test_full_run_rewrites_template() {
    let dir = tempfile::tempdir().unwrap();
    legacy_tree(dir.path());

    let mut migration = Migration::new(dir.path(), MigrationConfig::with_root_namespace("Shop"));
    migration.run().unwrap();

    let template = read(dir.path(), "Views/List.phtml");
    // Markup-first template gets a dedicated header block, no namespace
    assert!(template.starts_with("<?php\n\nuse Shop\\Core\\Helper;\n\n?>"));
    assert!(!template.contains("namespace"));
    assert!(template.contains("Helper::render()"));
}

#[test]
fn test_full_run_updates_composer_manifest() {
    let dir = tempfile::tempdir().unwrap();
    legacy_tree(dir.path());

    let mut migration = Migration::new(dir.path(), MigrationConfig::with_root_namespace("Shop"));
    migration.run().unwrap();

    let manifest: serde_json::Value =
        serde_json::from_str(&read(dir.path(), "composer.json")).unwrap();
    assert_eq!(manifest["name"], "acme/legacy");
    assert_eq!(manifest["autoload"]["psr-4"]["Shop\\App\\"], "App/");
    assert_eq!(manifest["autoload"]["psr-4"]["Shop\\Core\\"], "Core/");
    assert_eq!(manifest["autoload"]["psr-4"]["Shop\\Views\\"], "Views/");
    assert_eq!(manifest["require"]["php"], ">=8.0");
}

#[test]
fn test_run_is_idempotent_on_already_migrated_names() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "Core/Adapter.php",
        "<?php\nclass Adapter {\n}\n",
    );

    let mut migration = Migration::new(dir.path(), MigrationConfig::with_root_namespace("Shop"));
    let report = migration.run().unwrap();
    assert_eq!(report.files_migrated, 1);
    assert!(dir.path().join("Core/Adapter.php").is_file());

    let contents = read(dir.path(), "Core/Adapter.php");
    assert!(contents.contains("namespace Shop\\Core;"));
    assert!(contents.contains("class Adapter"));
}

#[test]
fn test_missing_base_path_fails() {
    let mut migration = Migration::new(
        "/definitely/not/a/real/base",
        MigrationConfig::default(),
    );
    assert!(migration.run().is_err());
}
