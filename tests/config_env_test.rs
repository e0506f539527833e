//! Environment override test, kept in its own binary since it mutates the
//! process environment.

use std::env;
use std::fs;

use tempfile::TempDir;

use treeforge::config::Settings;

#[test]
fn given_env_vars_when_load_then_override_local_config() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("treeforge.toml");
    fs::write(&path, "root_name = \"local_root\"\nbuilder_name = \"local\"\n").unwrap();
    env::set_var("TREEFORGE_ROOT_NAME", "env_root");
    env::set_var("TREEFORGE_STRICT_TARGETS", "true");
    env::set_var("TREEFORGE_NAMING__SPLIT_LEAF_PREFIX", "right_");

    // Act
    let settings = Settings::load(Some(path.as_path())).expect("load settings");

    // Assert
    assert_eq!(settings.root_name, "env_root");
    assert_eq!(settings.builder_name, "local");
    assert!(settings.strict_targets);
    assert_eq!(settings.naming.split_leaf_prefix, "right_");

    env::remove_var("TREEFORGE_ROOT_NAME");
    env::remove_var("TREEFORGE_STRICT_TARGETS");
    env::remove_var("TREEFORGE_NAMING__SPLIT_LEAF_PREFIX");
}
