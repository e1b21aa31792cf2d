use indextree::{Arena, NodeId};
use serde::{Deserialize, Serialize};

use crate::error::FsError;
use crate::layout::EntrySpec;

/// Access flags carried on every node. Nothing checks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    #[serde(rename = "r", default)]
    pub readable: bool,
    #[serde(rename = "w", default)]
    pub writable: bool,
    #[serde(rename = "x", default)]
    pub executable: bool,
}

impl Permissions {
    pub fn new(readable: bool, writable: bool, executable: bool) -> Self {
        Self { readable, writable, executable }
    }
}

impl Default for Permissions {
    // rw-
    fn default() -> Self {
        Self::new(true, true, false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    File(String),
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VfsNode {
    pub name: String,
    pub kind: NodeKind,
    pub permissions: Permissions,
}

impl VfsNode {
    fn file(name: &str, content: String, permissions: Permissions) -> Self {
        Self { name: name.to_string(), kind: NodeKind::File(content), permissions }
    }

    fn directory(name: &str, permissions: Permissions) -> Self {
        Self { name: name.to_string(), kind: NodeKind::Directory, permissions }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory)
    }

    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::File(content) => Some(content),
            NodeKind::Directory => None,
        }
    }
}

/// Outcome of walking a path.
///
/// `node` is `None` when every directory on the way exists but the last
/// name does not; `parent` and `path` then still describe where it would
/// live, which is what `write` needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub node: Option<NodeId>,
    /// Directory the final segment was looked up in.
    pub parent: NodeId,
    /// Final segment as written, `None` for paths without segments.
    pub leaf: Option<String>,
    /// Canonical path of `node`, or of `parent` when `node` is absent.
    pub path: String,
}

/// In-memory tree. Nodes live in an arena and `..` is derived from the
/// arena's parent link, so the structure holds no reference cycles.
#[derive(Debug, Clone)]
pub struct VirtualFileSystem {
    arena: Arena<VfsNode>,
    root: NodeId,
    cwd: NodeId,
    pwd: String,
}

impl Default for VirtualFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualFileSystem {
    /// Empty tree holding only the root directory.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(VfsNode::directory("/", Permissions::default()));
        Self { arena, root, cwd: root, pwd: "/".to_string() }
    }

    pub fn from_entries(entries: Vec<EntrySpec>) -> Result<Self, FsError> {
        let mut vfs = Self::new();
        let root = vfs.root;
        for entry in entries {
            vfs.build(root, entry)?;
        }
        Ok(vfs)
    }

    /// Load a tree from the JSON array format used by the browser page.
    pub fn from_json(json: &str) -> Result<Self, FsError> {
        let entries: Vec<EntrySpec> =
            serde_json::from_str(json).map_err(|e| FsError::Description(e.to_string()))?;
        Self::from_entries(entries)
    }

    fn build(&mut self, parent: NodeId, entry: EntrySpec) -> Result<(), FsError> {
        check_name(entry.name())?;
        if let Some(existing) = self.child(parent, entry.name()) {
            existing.remove_subtree(&mut self.arena);
        }
        match entry {
            EntrySpec::File { name, permissions, content } => {
                let id = self.arena.new_node(VfsNode::file(&name, content, permissions));
                self.insert_sorted(parent, id);
            }
            EntrySpec::Directory { name, permissions, content } => {
                let id = self.arena.new_node(VfsNode::directory(&name, permissions));
                self.insert_sorted(parent, id);
                for child in content {
                    self.build(id, child)?;
                }
            }
        }
        Ok(())
    }

    /// Serialize the live tree back into its description. Synthetic entries
    /// are not part of it.
    pub fn snapshot(&self) -> Vec<EntrySpec> {
        self.root.children(&self.arena).map(|id| self.describe(id)).collect()
    }

    fn describe(&self, id: NodeId) -> EntrySpec {
        let node = self.node(id);
        match &node.kind {
            NodeKind::File(content) => EntrySpec::File {
                name: node.name.clone(),
                permissions: node.permissions,
                content: content.clone(),
            },
            NodeKind::Directory => EntrySpec::Directory {
                name: node.name.clone(),
                permissions: node.permissions,
                content: id.children(&self.arena).map(|c| self.describe(c)).collect(),
            },
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn current_dir(&self) -> NodeId {
        self.cwd
    }

    /// Canonical path of the working directory, e.g. `/Projects/`.
    pub fn current_path(&self) -> &str {
        &self.pwd
    }

    /// # Panics
    /// If `id` was removed from the tree. Ids handed out by `resolve` stay
    /// valid until the next `write` to the same name.
    pub fn node(&self, id: NodeId) -> &VfsNode {
        self.arena[id].get()
    }

    /// Real children only, already in name order.
    fn child(&self, dir: NodeId, name: &str) -> Option<NodeId> {
        dir.children(&self.arena).find(|id| self.node(*id).name == name)
    }

    // `.` and `..` first, then the real children; the root is its own parent
    fn lookup(&self, dir: NodeId, name: &str) -> Option<NodeId> {
        match name {
            "." => Some(dir),
            ".." => Some(self.arena[dir].parent().unwrap_or(dir)),
            _ => self.child(dir, name),
        }
    }

    /// Every entry of a directory as `(name, id)`: the synthetic `.` and
    /// `..` followed by the sorted real children. Empty for files.
    pub fn entries(&self, dir: NodeId) -> Vec<(String, NodeId)> {
        if !self.node(dir).is_dir() {
            return Vec::new();
        }
        let parent = self.arena[dir].parent().unwrap_or(dir);
        let mut entries = vec![(".".to_string(), dir), ("..".to_string(), parent)];
        entries.extend(dir.children(&self.arena).map(|id| (self.node(id).name.clone(), id)));
        entries
    }

    pub fn resolve(&self, path: &str) -> Result<Resolved, FsError> {
        if path.is_empty() {
            return Err(FsError::EmptyPath);
        }
        let (mut current, mut canonical) = if path.starts_with('/') {
            (self.root, "/".to_string())
        } else {
            (self.cwd, self.pwd.clone())
        };

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((leaf, dirs)) = segments.split_last() else {
            return Ok(Resolved { node: Some(current), parent: current, leaf: None, path: canonical });
        };

        for segment in dirs {
            match self.lookup(current, segment) {
                Some(next) if self.node(next).is_dir() => {
                    canonical = advance(&canonical, segment);
                    current = next;
                }
                _ => {
                    tracing::trace!(path, at = %canonical, segment, "resolution stopped");
                    return Err(FsError::Unresolvable { path: canonical, segment: segment.to_string() });
                }
            }
        }

        let node = self.lookup(current, leaf);
        if node.is_some() {
            canonical = advance(&canonical, leaf);
        }
        Ok(Resolved { node, parent: current, leaf: Some(leaf.to_string()), path: canonical })
    }

    fn resolve_node(&self, path: &str) -> Option<&VfsNode> {
        let id = self.resolve(path).ok()?.node?;
        Some(self.node(id))
    }

    pub fn exists(&self, path: &str) -> bool {
        self.resolve_node(path).is_some()
    }

    pub fn is_file(&self, path: &str) -> bool {
        self.resolve_node(path).is_some_and(|n| !n.is_dir())
    }

    pub fn is_directory(&self, path: &str) -> bool {
        self.resolve_node(path).is_some_and(VfsNode::is_dir)
    }

    /// Content of an existing file. `None` for directories and missing
    /// paths; an empty file gives `Some("")`.
    pub fn read(&self, path: &str) -> Option<&str> {
        self.resolve_node(path)?.content()
    }

    /// Entry names of the directory at `path`. Anything that is not a
    /// resolvable directory lists as empty.
    pub fn list(&self, path: &str) -> Vec<String> {
        match self.resolve(path) {
            Ok(Resolved { node: Some(id), .. }) => self.names(id),
            _ => Vec::new(),
        }
    }

    pub fn list_current(&self) -> Vec<String> {
        self.names(self.cwd)
    }

    fn names(&self, dir: NodeId) -> Vec<String> {
        self.entries(dir).into_iter().map(|(name, _)| name).collect()
    }

    /// cd. The working state is left alone unless `path` is a directory.
    pub fn change_directory(&mut self, path: &str) -> Result<(), FsError> {
        let resolved = self.resolve(path)?;
        match resolved.node {
            Some(id) if self.node(id).is_dir() => {
                tracing::debug!(from = %self.pwd, to = %resolved.path, "changed directory");
                self.cwd = id;
                self.pwd = resolved.path;
                Ok(())
            }
            _ => Err(FsError::NotADirectory(path.to_string())),
        }
    }

    /// Create or overwrite the file at `path`. An existing file of the same
    /// name is dropped first, so the last write wins. Directories are never
    /// replaced.
    pub fn write(&mut self, path: &str, content: &str) -> Result<(), FsError> {
        let resolved = self.resolve(path)?;
        let leaf = resolved.leaf.ok_or_else(|| FsError::IsADirectory(path.to_string()))?;
        if let Some(existing) = resolved.node {
            if self.node(existing).is_dir() {
                return Err(FsError::IsADirectory(path.to_string()));
            }
            existing.remove_subtree(&mut self.arena);
        }
        check_name(&leaf)?;

        let id = self.arena.new_node(VfsNode::file(&leaf, content.to_string(), Permissions::default()));
        self.insert_sorted(resolved.parent, id);
        tracing::debug!(dir = %resolved.path, name = %leaf, bytes = content.len(), "wrote file");
        Ok(())
    }

    fn insert_sorted(&mut self, dir: NodeId, id: NodeId) {
        let name = self.node(id).name.clone();
        let after = dir.children(&self.arena).find(|c| self.node(*c).name > name);
        match after {
            Some(sibling) => sibling.insert_before(id, &mut self.arena),
            None => dir.append(id, &mut self.arena),
        }
    }
}

fn check_name(name: &str) -> Result<(), FsError> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') {
        return Err(FsError::InvalidName(name.to_string()));
    }
    Ok(())
}

// canonical path after consuming one segment
fn advance(canonical: &str, segment: &str) -> String {
    match segment {
        "." => canonical.to_string(),
        ".." => parent_path(canonical),
        name => format!("{}{}/", canonical, name),
    }
}

/// Strip the last non-empty component: `/a/b/` -> `/a/`, `/` -> `/`.
pub fn parent_path(path: &str) -> String {
    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let mut parent = String::from("/");
    for part in parts.iter().take(parts.len().saturating_sub(1)) {
        parent.push_str(part);
        parent.push('/');
    }
    parent
}
