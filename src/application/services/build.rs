//! Build script service
//!
//! Materializes a script's initial tree and drives a builder through its steps.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::script::{BuildScript, NodeTemplate};
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{BuildOutcome, TreeArena, TreeBuilder};
use crate::infrastructure::traits::FileSystem;

/// Output from running a build script.
#[derive(Debug)]
pub struct BuildOutput {
    /// Builder after the last step, owning the grown tree
    pub builder: TreeBuilder<String>,
    /// One outcome per step that ran, in step order
    pub outcomes: Vec<BuildOutcome>,
}

/// Service for running build scripts.
pub struct BuildService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl BuildService {
    /// Create a new build service.
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    /// Read, parse and run the script at `path`.
    #[instrument(level = "debug", skip(self))]
    pub fn run_file(&self, path: &Path) -> ApplicationResult<BuildOutput> {
        let problem = if !self.fs.exists(path) {
            Some("no such file")
        } else if !self.fs.is_file(path) {
            Some("not a regular file")
        } else {
            None
        };
        if let Some(message) = problem {
            return Err(ApplicationError::Script {
                path: path.to_path_buf(),
                message: message.to_string(),
            });
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read build script", path)?;
        let script = BuildScript::parse(&content, path)?;
        self.run(&script)
    }

    /// Run a parsed script.
    ///
    /// Without a `[tree]` section the builder starts from a bare root decision
    /// named after `root_name` in the settings.
    pub fn run(&self, script: &BuildScript) -> ApplicationResult<BuildOutput> {
        let mut builder = self.builder_for(script)?;
        let mut outcomes = Vec::new();

        for (i, step) in script.steps.iter().enumerate() {
            debug!("step {}: {:?}", i + 1, step);
            if let Some(path) = &step.target {
                let target = builder
                    .tree()
                    .resolve_path(builder.root(), path)
                    .ok_or_else(|| ApplicationError::TargetNotFound(path.clone()))?;
                builder.set_target(target)?;
            }
            if let Some(mode) = &step.mode {
                builder.set_mode(mode);
            }
            if step.run {
                outcomes.push(builder.run()?);
            }
        }

        info!(
            "builder '{}' ran {} of {} step(s)",
            builder.name(),
            outcomes.len(),
            script.steps.len()
        );
        Ok(BuildOutput { builder, outcomes })
    }

    fn builder_for(&self, script: &BuildScript) -> ApplicationResult<TreeBuilder<String>> {
        let name = script
            .builder
            .name
            .clone()
            .unwrap_or_else(|| self.settings.builder_name.clone());

        let template = script
            .tree
            .clone()
            .unwrap_or_else(|| NodeTemplate::decision(self.settings.root_name.clone()));
        let mut tree = TreeArena::new();
        let root = template.materialize(&mut tree)?;

        Ok(TreeBuilder::with_root(name, tree, root)?
            .with_policy(self.settings.naming.to_policy())
            .with_strict_targets(self.settings.strict_targets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::script::Step;
    use crate::domain::BuildMode;
    use crate::infrastructure::RealFileSystem;

    fn service(settings: Settings) -> BuildService {
        BuildService::new(Arc::new(RealFileSystem), Arc::new(settings))
    }

    #[test]
    fn given_empty_script_when_running_then_uses_configured_names() {
        let settings = Settings {
            builder_name: "fallback".into(),
            root_name: "top".into(),
            ..Settings::default()
        };

        let output = service(settings).run(&BuildScript::default()).unwrap();

        assert_eq!(output.builder.name(), "fallback");
        let root = output.builder.tree().node(output.builder.root()).unwrap();
        assert_eq!(root.name(), "top");
        assert!(output.outcomes.is_empty());
    }

    #[test]
    fn given_unknown_target_path_when_running_then_target_not_found() {
        let script = BuildScript {
            steps: vec![Step {
                target: Some("root/missing".into()),
                mode: None,
                run: true,
            }],
            ..BuildScript::default()
        };

        let err = service(Settings::default()).run(&script).unwrap_err();

        assert!(matches!(err, ApplicationError::TargetNotFound(p) if p == "root/missing"));
    }

    #[test]
    fn given_mode_only_step_when_running_then_no_outcome_recorded() {
        let script = BuildScript {
            steps: vec![Step {
                target: None,
                mode: Some("stopping".into()),
                run: false,
            }],
            ..BuildScript::default()
        };

        let output = service(Settings::default()).run(&script).unwrap();

        assert!(output.outcomes.is_empty());
        assert_eq!(output.builder.mode(), BuildMode::Stopping);
    }
}
