//! Integration tests for running build scripts through the service container

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use treeforge::application::{ApplicationError, TreeReport};
use treeforge::config::Settings;
use treeforge::domain::{BuildMode, BuildOutcome, DomainError, TreeRender};
use treeforge::infrastructure::{FileSystem, ServiceContainer};
use treeforge::util::testing;

const SCENARIO: &str = r#"
[builder]
name = "MockBuilder"

[tree]
name = "root"
  [[tree.children]]
  name = "A"
  [[tree.children]]
  name = "B"
  kind = "leaf"
  payload = "b"

[[steps]]
target = "root/A"

[[steps]]
mode = "stopping"

[[steps]]
target = "root"
mode = "pruning"
"#;

/// In-memory filesystem keyed by path.
#[derive(Default)]
struct MemoryFileSystem {
    files: HashMap<PathBuf, String>,
}

impl MemoryFileSystem {
    fn with_file(path: &str, content: &str) -> Self {
        let mut files = HashMap::new();
        files.insert(PathBuf::from(path), content.to_string());
        Self { files }
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.exists(path)
    }
}

fn write_script(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("build.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn given_scenario_script_when_running_then_split_stop_prune_applied() {
    // Arrange
    testing::init_test_setup();
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, SCENARIO);
    let container = ServiceContainer::new(Settings::default());

    // Act
    let output = container.build.run_file(&script).unwrap();

    // Assert
    let builder = &output.builder;
    let tree = builder.tree();
    let root = builder.root();
    assert_eq!(builder.name(), "MockBuilder");
    assert_eq!(builder.mode(), BuildMode::Pruning);
    assert_eq!(output.outcomes.len(), 3);
    assert!(matches!(output.outcomes[0], BuildOutcome::Split { .. }));
    assert!(matches!(output.outcomes[1], BuildOutcome::Stopped { .. }));
    assert!(matches!(
        output.outcomes[2],
        BuildOutcome::Pruned {
            removed: Some(_),
            ..
        }
    ));

    let a = tree.resolve_path(root, "root/A").unwrap();
    assert_eq!(tree.children_of(root), &[a]);
    let names: Vec<_> = tree
        .children_of(a)
        .iter()
        .map(|&c| tree.node(c).unwrap().name())
        .collect();
    assert_eq!(
        names,
        vec!["split_left_of_A", "split_right_of_A", "stopped_leaf_of_A"]
    );
}

#[test]
fn given_scenario_result_when_reporting_then_counts_leaves() {
    // Arrange
    let container = ServiceContainer::with_deps(
        Settings::default(),
        Arc::new(MemoryFileSystem::with_file("mem.toml", SCENARIO)),
    );
    let output = container.build.run_file(Path::new("mem.toml")).unwrap();
    let builder = &output.builder;

    // Act
    let report = TreeReport::collect(builder.tree(), builder.root());

    // Assert
    assert_eq!(report.leaf_count, 2);
    assert_eq!(report.height, 3);
    let rendered = builder.tree().to_tree_string(builder.root()).to_string();
    assert!(rendered.contains("stopped_leaf_of_A [leaf]"));
    assert!(!rendered.contains("B [leaf: b]"));
}

#[test]
fn given_custom_naming_when_running_then_prefixes_applied() {
    // Arrange
    let mut settings = Settings::default();
    settings.naming.split_decision_prefix = "L_".into();
    settings.naming.split_leaf_prefix = "R_".into();
    let container = ServiceContainer::with_deps(
        settings,
        Arc::new(MemoryFileSystem::with_file("s.toml", "[[steps]]\n")),
    );

    // Act
    let output = container.build.run_file(Path::new("s.toml")).unwrap();

    // Assert
    let tree = output.builder.tree();
    let root = output.builder.root();
    assert!(tree.resolve_path(root, "root/L_root").is_some());
    assert!(tree.resolve_path(root, "root/R_root").is_some());
}

#[test]
fn given_missing_script_when_running_then_script_error() {
    let container =
        ServiceContainer::with_deps(Settings::default(), Arc::new(MemoryFileSystem::default()));

    let err = container
        .build
        .run_file(Path::new("nope.toml"))
        .unwrap_err();

    assert!(matches!(err, ApplicationError::Script { .. }));
}

#[test]
fn given_step_on_leaf_when_splitting_then_domain_error() {
    let script = r#"
[tree]
name = "root"
  [[tree.children]]
  name = "L"
  kind = "leaf"

[[steps]]
target = "root/L"
"#;
    let container = ServiceContainer::with_deps(
        Settings::default(),
        Arc::new(MemoryFileSystem::with_file("leaf.toml", script)),
    );

    let err = container
        .build
        .run_file(Path::new("leaf.toml"))
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::NotComposite(ref name)) if name == "L"
    ));
}

#[test]
fn given_malformed_toml_when_running_then_script_error_names_path() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "[[steps]\n");
    let container = ServiceContainer::new(Settings::default());

    let err = container.build.run_file(&script).unwrap_err();

    assert!(err.to_string().contains("build.toml"));
}
