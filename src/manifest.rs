/*!
 * Manifest generation
 *
 * The manifest is a plain-text outline of the original directory tree. Each
 * level lists its files first and its subdirectories second, both in
 * ascending order, indented by four spaces per level of depth.
 */

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// File name of the manifest inside the output directory
pub const MANIFEST_FILE_NAME: &str = "file_manifest.txt";

const MANIFEST_HEADER: &str = "Repository structure:";
const INDENT: &str = "    ";

/// One directory level of the reconstructed tree
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// File names directly at this level
    pub files: BTreeSet<String>,
    /// Subdirectories keyed by name
    pub children: BTreeMap<String, TreeNode>,
}

impl TreeNode {
    /// Build a tree from slash-separated paths
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut root = Self::default();
        for path in paths {
            root.insert(path.as_ref());
        }
        root
    }

    /// Insert a single path, creating intermediate directories as needed
    pub fn insert(&mut self, path: &str) {
        let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some(file) = segments.pop() else {
            return;
        };

        let mut node = self;
        for dir in segments {
            node = node.children.entry(dir.to_string()).or_default();
        }
        node.files.insert(file.to_string());
    }

    fn render_into(&self, depth: usize, out: &mut String) {
        let indent = INDENT.repeat(depth);
        for file in &self.files {
            out.push_str(&indent);
            out.push_str(file);
            out.push('\n');
        }
        for (name, child) in &self.children {
            out.push_str(&indent);
            out.push_str(name);
            out.push('\n');
            child.render_into(depth + 1, out);
        }
    }
}

/// Render the manifest text for a set of paths
pub fn build_manifest<I, S>(paths: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let tree = TreeNode::from_paths(paths);
    let mut out = format!("{MANIFEST_HEADER}\n\n");
    tree.render_into(0, &mut out);
    out
}

/// Write the manifest into `output_dir` and return its path
pub fn write_manifest<I, S>(output_dir: &Path, paths: I) -> Result<PathBuf>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let manifest_path = output_dir.join(MANIFEST_FILE_NAME);
    fs::write(&manifest_path, build_manifest(paths))?;
    Ok(manifest_path)
}
