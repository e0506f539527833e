use std::path::{Path, PathBuf};

/// Expand `~`, `$VAR` and `${VAR}` in a path.
///
/// Unresolvable variables leave the path unchanged.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(&raw)
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_plain_path_when_expanding_then_unchanged() {
        assert_eq!(expand_path(Path::new("a/b.toml")), PathBuf::from("a/b.toml"));
    }

    #[test]
    fn given_unknown_variable_when_expanding_then_unchanged() {
        let path = Path::new("$TREEFORGE_SURELY_UNSET_VAR/b.toml");
        assert_eq!(expand_path(path), path.to_path_buf());
    }

    #[test]
    fn given_home_variable_when_expanding_then_substituted() {
        let Ok(home) = std::env::var("HOME") else {
            return;
        };
        assert_eq!(
            expand_path(Path::new("$HOME/x.toml")),
            PathBuf::from(format!("{home}/x.toml"))
        );
    }
}
