//! Build scripts: a TOML description of an initial tree and builder steps.
//!
//! ```toml
//! [builder]
//! name = "MockBuilder"
//!
//! [tree]
//! name = "root"
//!   [[tree.children]]
//!   name = "A"
//!   [[tree.children]]
//!   name = "B"
//!   kind = "leaf"
//!
//! [[steps]]
//! target = "root/A"
//! mode = "splitting"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{NodeId, TreeArena};

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    #[default]
    Decision,
    Leaf,
}

/// One node of the initial tree, with its children.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct NodeTemplate {
    pub name: String,
    #[serde(default)]
    pub kind: TemplateKind,
    #[serde(default)]
    pub payload: Option<String>,
    #[serde(default)]
    pub children: Vec<NodeTemplate>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct BuilderSection {
    pub name: Option<String>,
}

/// One builder step: optionally retarget, optionally switch mode, then run.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Step {
    /// Slash-separated name path from the root, e.g. `root/A`
    #[serde(default)]
    pub target: Option<String>,
    /// Mode name; unknown names keep the current mode
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default = "default_run")]
    pub run: bool,
}

fn default_run() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct BuildScript {
    pub builder: BuilderSection,
    pub tree: Option<NodeTemplate>,
    pub steps: Vec<Step>,
}

impl BuildScript {
    /// Parse script text; `path` is only used for error messages.
    pub fn parse(content: &str, path: &Path) -> ApplicationResult<Self> {
        let script: Self = toml::from_str(content).map_err(|e| ApplicationError::Script {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if let Some(tree) = &script.tree {
            tree.validate(path)?;
            if tree.kind != TemplateKind::Decision {
                return Err(ApplicationError::Script {
                    path: path.to_path_buf(),
                    message: format!("root '{}' must be a decision node", tree.name),
                });
            }
        }
        debug!("parsed build script with {} step(s)", script.steps.len());
        Ok(script)
    }
}

impl NodeTemplate {
    pub fn decision(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TemplateKind::Decision,
            payload: None,
            children: Vec::new(),
        }
    }

    fn validate(&self, path: &Path) -> ApplicationResult<()> {
        let mut stack = vec![self];
        while let Some(template) = stack.pop() {
            match template.kind {
                TemplateKind::Leaf if !template.children.is_empty() => {
                    return Err(ApplicationError::Script {
                        path: PathBuf::from(path),
                        message: format!("leaf '{}' cannot have children", template.name),
                    });
                }
                TemplateKind::Decision if template.payload.is_some() => {
                    return Err(ApplicationError::Script {
                        path: PathBuf::from(path),
                        message: format!("decision '{}' cannot carry a payload", template.name),
                    });
                }
                _ => stack.extend(template.children.iter()),
            }
        }
        Ok(())
    }

    /// Create the template's nodes in `tree` and wire them up.
    ///
    /// Returns the id of the template's top node.
    pub fn materialize(&self, tree: &mut TreeArena<String>) -> ApplicationResult<NodeId> {
        let top = self.insert_into(tree);
        let mut stack = vec![(self, top)];

        while let Some((template, id)) = stack.pop() {
            for child in &template.children {
                let child_id = child.insert_into(tree);
                tree.add(id, child_id)?;
                stack.push((child, child_id));
            }
        }

        Ok(top)
    }

    fn insert_into(&self, tree: &mut TreeArena<String>) -> NodeId {
        match self.kind {
            TemplateKind::Decision => tree.insert_decision(self.name.clone()),
            TemplateKind::Leaf => tree.insert_leaf(self.name.clone(), self.payload.clone()),
        }
    }
}
