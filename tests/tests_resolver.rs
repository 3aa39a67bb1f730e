//! Tests for resolution: candidate filtering, index lookup, and import-set
//! construction.
//!
//! The scenario most of these build on: a project with `Core\Base`,
//! `Core\Loggable`, `Http\Request` and `App\Helper`, and one file under
//! analysis referencing them plus an unknown global.

use std::path::PathBuf;

use psrmig::parser::parse_php;
use psrmig::project::SourceFile;
use psrmig::semantic::{Resolver, SymbolIndex, build_import_set, extract_references};
use psrmig::syntax::declared_type_names;

fn project_file(path: &str, namespace: &str, contents: &str) -> SourceFile {
    let mut file = SourceFile::new(PathBuf::from(path), contents.to_string());
    file.namespace = namespace.to_string();
    file
}

fn project_index() -> SymbolIndex {
    SymbolIndex::build(&[
        project_file("Core/Base.php", "Core", ""),
        project_file("Core/Loggable.php", "Core", ""),
        project_file("Http/Request.php", "Http", ""),
        project_file("App/Helper.php", "App", ""),
        project_file("App/Service.php", "App", ""),
    ])
}

fn imports_for(file: &SourceFile, index: &SymbolIndex) -> Vec<String> {
    let parse = parse_php(&file.contents);
    let candidates = extract_references(&parse.root);
    let declared = declared_type_names(&parse.root);
    let resolver = Resolver::new(index);
    build_import_set(resolver.resolve(&candidates, file, &declared))
}

#[test]
fn test_service_scenario_resolves_all_references() {
    let source = "<?php
class Service extends Base implements Loggable {
    public function handle(Request $req) {
        $h = new Helper();
        $h = new Helper();
        try {
            return Helper::wrap($req);
        } catch (Exception $e) {
            throw $e;
        }
    }
}";
    let index = project_index();
    let file = project_file("App/Service.php", "App", source);
    let imports = imports_for(&file, &index);
    assert_eq!(
        imports,
        [
            "Core\\Base",
            "Core\\Loggable",
            "Http\\Request",
            "App\\Helper",
            "Exception",
        ]
        .map(String::from)
    );
}

#[test]
fn test_self_reference_is_dropped() {
    let index = project_index();
    let file = project_file(
        "App/Service.php",
        "App",
        "<?php class Service { function clone_me() { return new Service(); } }",
    );
    assert!(imports_for(&file, &index).is_empty());
}

#[test]
fn test_existing_import_is_not_duplicated() {
    let index = project_index();
    let file = project_file(
        "App/Job.php",
        "App",
        "<?php\nuse Http\\Request;\nclass Job { function f(Request $r) { return new Helper(); } }",
    );
    assert_eq!(imports_for(&file, &index), ["App\\Helper"].map(String::from));
}

#[test]
fn test_local_declaration_shadows_index() {
    let index = project_index();
    // This file declares its own Helper; the project-wide App\Helper must
    // not be imported over it.
    let file = project_file(
        "Legacy/Bundle.php",
        "Legacy",
        "<?php\nclass Helper {}\nclass Bundle { function f() { return new Helper(); } }",
    );
    assert!(imports_for(&file, &index).is_empty());
}

#[test]
fn test_declaration_inside_function_shadows_index() {
    let index = project_index();
    // Legacy bootstrap style: the class is declared inside an init function
    let file = project_file(
        "Legacy/Boot.php",
        "Legacy",
        "<?php
function init() {
    class Helper {}
}
class Boot { function f() { return new Helper(); } }",
    );
    assert!(imports_for(&file, &index).is_empty());
}

#[test]
fn test_unknown_names_pass_through_bare() {
    let index = project_index();
    let file = project_file(
        "App/Io.php",
        "App",
        "<?php class Io { function f() { throw new RuntimeException('x'); } }",
    );
    assert_eq!(
        imports_for(&file, &index),
        ["RuntimeException"].map(String::from)
    );
}

#[test]
fn test_qualified_reference_is_not_resolved_via_index() {
    let index = project_index();
    // `Sub\Helper` resolves against the file's namespace at runtime; the
    // index entry for the unrelated bare `Helper` must not capture it
    let file = project_file(
        "App/Relative.php",
        "App",
        "<?php class Relative { function f() { return new Sub\\Helper(); } }",
    );
    assert_eq!(
        imports_for(&file, &index),
        ["Sub\\Helper"].map(String::from)
    );
}

#[test]
fn test_duplicates_across_contexts_collapse() {
    let index = project_index();
    let file = project_file(
        "App/Multi.php",
        "App",
        "<?php
class Multi extends Helper {
    function f(Helper $h) {
        Helper::go();
        return new Helper();
    }
}",
    );
    assert_eq!(imports_for(&file, &index), ["App\\Helper"].map(String::from));
}

#[test]
fn test_first_occurrence_order_is_kept() {
    let index = project_index();
    let file = project_file(
        "App/Ordered.php",
        "App",
        "<?php
class Ordered {
    function f() {
        $a = new Request();
        $b = new Base();
        $c = new Request();
    }
}",
    );
    assert_eq!(
        imports_for(&file, &index),
        ["Http\\Request", "Core\\Base"].map(String::from)
    );
}

#[test]
fn test_empty_class_yields_empty_set() {
    let index = project_index();
    let file = project_file("App/Empty.php", "App", "<?php class Nothing {}");
    assert!(imports_for(&file, &index).is_empty());
}

#[test]
fn test_resolution_is_idempotent() {
    let index = project_index();
    let file = project_file(
        "App/Stable.php",
        "App",
        "<?php class Stable { function f(Request $r) { return new Helper(); } }",
    );
    let first = imports_for(&file, &index);
    let second = imports_for(&file, &index);
    assert_eq!(first, second);
    assert_eq!(
        first,
        ["Http\\Request", "App\\Helper"].map(String::from)
    );
}

#[test]
fn test_build_import_set_deduplicates_preserving_order() {
    let imports = build_import_set(vec![
        "Core\\Base".to_string(),
        "App\\Helper".to_string(),
        "Core\\Base".to_string(),
    ]);
    assert_eq!(imports, ["Core\\Base", "App\\Helper"].map(String::from));
}
