//! Loading catalogs from disk.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use primer_core::{Category, Determinism};
use primer_registry::{LoadError, Registry};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("file has parent")).expect("dir should create");
    fs::write(path, content).expect("file should write");
}

#[test]
fn loads_units_with_directives_in_sorted_order() {
    let temp = TempDir::new().expect("tempdir should create");
    let root = temp.path();
    write(
        root,
        "functions/hello_alice.py",
        "# @expect: Hello, Alice!\nprint(\"Hello, Alice!\")\n",
    );
    write(
        root,
        "io/read_sample.py",
        "# @fixture: sample.json\n# @expect-empty\nopen('sample.json').read()\n",
    );
    write(
        root,
        "control-flow/ask.py",
        "# @name: ask-name\n# @stdin: Ada\n# @stdin: 36\nname = input()\n",
    );
    write(root, "fixtures/sample.json", "{}\n");

    let registry = Registry::load(root).expect("catalog should load");
    let names: Vec<&str> = registry.list(None).map(|unit| unit.name()).collect();
    assert_eq!(names, vec!["ask-name", "hello-alice", "read-sample"]);

    let hello = registry.get("hello-alice").expect("unit exists");
    assert_eq!(hello.category(), Category::Functions);
    assert_eq!(hello.expected_output(), Some(&["Hello, Alice!".to_string()][..]));
    assert!(hello.is_comparable());
    assert_eq!(hello.origin(), Path::new("functions/hello_alice.py"));

    let read = registry.get("read-sample").expect("unit exists");
    assert_eq!(read.expected_output(), Some(&[][..]));
    assert!(read.requires_fixture().contains(Path::new("sample.json")));

    let ask = registry.get("ask-name").expect("unit exists");
    assert_eq!(ask.stdin(), Some("Ada\n36\n"));
    assert_eq!(ask.category(), Category::ControlFlow);

    assert_eq!(registry.fixtures_dir(), Some(root.join("fixtures").as_path()));
}

#[test]
fn duplicate_names_fail_with_both_paths() {
    let temp = TempDir::new().expect("tempdir should create");
    let root = temp.path();
    write(root, "oop/classes.py", "print(1)\n");
    write(root, "functions/other.py", "# @name: classes\nprint(2)\n");

    let err = Registry::load(root).expect_err("duplicate should fail");
    match err {
        LoadError::DuplicateName { name, first, second } => {
            assert_eq!(name, "classes");
            assert_eq!(first, Path::new("functions/other.py"));
            assert_eq!(second, Path::new("oop/classes.py"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn header_only_file_is_empty_source() {
    let temp = TempDir::new().expect("tempdir should create");
    write(temp.path(), "io/nothing.py", "# @expect: 1\n\n");

    let err = Registry::load(temp.path()).expect_err("empty should fail");
    assert!(matches!(err, LoadError::EmptySource { ref name, .. } if name == "nothing"));
    assert!(err.to_string().contains("nothing"));
}

#[test]
fn bad_directive_names_file_and_line() {
    let temp = TempDir::new().expect("tempdir should create");
    write(temp.path(), "io/typo.py", "# about io\n# @expct: 1\nprint(1)\n");

    let err = Registry::load(temp.path()).expect_err("typo should fail");
    let message = err.to_string();
    assert!(message.contains("typo.py:2"), "{message}");
    assert!(message.contains("@expct"), "{message}");
}

#[test]
fn unknown_category_directory_fails() {
    let temp = TempDir::new().expect("tempdir should create");
    write(temp.path(), "misc/thing.py", "print(1)\n");

    let err = Registry::load(temp.path()).expect_err("unknown category should fail");
    assert!(err.to_string().contains("misc"));
}

#[test]
fn escaping_fixture_is_invalid() {
    let temp = TempDir::new().expect("tempdir should create");
    write(temp.path(), "io/escape.py", "# @fixture: ../etc/passwd\nprint(1)\n");

    let err = Registry::load(temp.path()).expect_err("escaping fixture should fail");
    assert!(matches!(err, LoadError::InvalidUnit { .. }));
}

#[test]
fn random_import_with_expectation_is_tagged() {
    let temp = TempDir::new().expect("tempdir should create");
    write(
        temp.path(),
        "data-structures/dice.py",
        "# @expect: 4\nimport random\nprint(random.randint(1, 6))\n",
    );
    write(
        temp.path(),
        "data-structures/coin.py",
        "# @nondeterministic\nimport random\nprint(random.choice('HT'))\n",
    );

    let registry = Registry::load(temp.path()).expect("catalog should load");
    let dice = registry.get("dice").expect("unit exists");
    assert_eq!(
        dice.determinism(),
        &Determinism::Detected {
            marker: "import random".to_string()
        }
    );
    assert!(!dice.is_comparable());
    assert_eq!(registry.get("coin").expect("unit exists").determinism(), &Determinism::Declared);
}

#[test]
fn missing_root_is_a_load_error() {
    let temp = TempDir::new().expect("tempdir should create");
    let err = Registry::load(&temp.path().join("nope")).expect_err("missing root");
    assert!(matches!(err, LoadError::MissingRoot(_)));
}
