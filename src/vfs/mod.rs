//! Virtual file tree
//!
//! The workspace's files live entirely in memory: a single rooted tree of
//! file and folder nodes. Nothing here touches disk; import/export lives in
//! the `project` module. All structural operations are no-ops on invalid
//! references (unknown ids, creating under a file) because those only arise
//! from stale UI state, not external input.

pub mod clipboard;

use std::fmt;

use tracing::debug;

pub use clipboard::{ClipAction, Clipboard};

/// Identifier for a tree node, unique for the lifetime of the session.
/// Ids are handed out by the tree and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// File-or-folder payload of a node.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Leaf node holding arbitrary text.
    File { content: String },
    /// Folder holding ordered children. Insertion order is display order.
    Folder {
        children: Vec<FileNode>,
        /// UI-only flag; toggled independently of data validity.
        is_expanded: bool,
    },
}

/// A node in the virtual file tree.
#[derive(Debug, Clone)]
pub struct FileNode {
    pub id: NodeId,
    /// Display name, including extension for files.
    pub name: String,
    /// Back-reference to the owning folder; `None` only for the root.
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

impl FileNode {
    pub fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Folder { .. })
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File { .. })
    }

    /// Stored text for file nodes, `None` for folders.
    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::File { content } => Some(content),
            NodeKind::Folder { .. } => None,
        }
    }

    /// Children for folder nodes; empty slice for files.
    pub fn children(&self) -> &[FileNode] {
        match &self.kind {
            NodeKind::Folder { children, .. } => children,
            NodeKind::File { .. } => &[],
        }
    }

    pub fn is_expanded(&self) -> bool {
        matches!(self.kind, NodeKind::Folder { is_expanded: true, .. })
    }

    fn children_mut(&mut self) -> Option<&mut Vec<FileNode>> {
        match &mut self.kind {
            NodeKind::Folder { children, .. } => Some(children),
            NodeKind::File { .. } => None,
        }
    }
}

/// A node's position in the tree, produced by [`FileTree::paths`].
#[derive(Debug, Clone)]
pub struct PathEntry {
    pub id: NodeId,
    /// Slash-joined path relative to the root (root name excluded).
    pub path: String,
    pub is_file: bool,
}

/// The session's file tree. Owns the root folder and the id counter.
///
/// Mutation goes through `&mut self`; the workspace is the single owner, so
/// there is no shared state to keep consistent beyond the tree itself.
#[derive(Debug, Clone)]
pub struct FileTree {
    root: FileNode,
    next_id: u64,
}

impl FileTree {
    /// Create a tree holding a single expanded root folder.
    pub fn new(root_name: &str) -> Self {
        let root = FileNode {
            id: NodeId(0),
            name: root_name.to_string(),
            parent: None,
            kind: NodeKind::Folder {
                children: Vec::new(),
                is_expanded: true,
            },
        };
        Self { root, next_id: 1 }
    }

    fn alloc_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn root(&self) -> &FileNode {
        &self.root
    }

    pub fn root_id(&self) -> NodeId {
        self.root.id
    }

    /// Depth-first lookup by id.
    pub fn find(&self, id: NodeId) -> Option<&FileNode> {
        fn dfs(node: &FileNode, id: NodeId) -> Option<&FileNode> {
            if node.id == id {
                return Some(node);
            }
            node.children().iter().find_map(|c| dfs(c, id))
        }
        dfs(&self.root, id)
    }

    fn find_mut(&mut self, id: NodeId) -> Option<&mut FileNode> {
        fn dfs(node: &mut FileNode, id: NodeId) -> Option<&mut FileNode> {
            if node.id == id {
                return Some(node);
            }
            match &mut node.kind {
                NodeKind::Folder { children, .. } => {
                    children.iter_mut().find_map(|c| dfs(c, id))
                }
                NodeKind::File { .. } => None,
            }
        }
        dfs(&mut self.root, id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.find(id).is_some()
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.find(id).and_then(|n| n.parent)
    }

    /// Total number of nodes, root included.
    pub fn node_count(&self) -> usize {
        fn count(node: &FileNode) -> usize {
            1 + node.children().iter().map(count).sum::<usize>()
        }
        count(&self.root)
    }

    /// Flip `is_expanded` on the target folder. No-op for files and unknown ids.
    pub fn toggle_expanded(&mut self, id: NodeId) {
        if let Some(node) = self.find_mut(id) {
            if let NodeKind::Folder { is_expanded, .. } = &mut node.kind {
                *is_expanded = !*is_expanded;
            }
        }
    }

    /// Create a file under `parent`, appended after existing children.
    /// The parent folder is forced open so the new node is visible.
    /// Returns `None` (and leaves the tree untouched) unless `parent`
    /// resolves to a folder.
    pub fn create_file(&mut self, parent: NodeId, name: &str, content: &str) -> Option<NodeId> {
        let id = self.insert_child(parent, |id, parent| FileNode {
            id,
            name: name.to_string(),
            parent: Some(parent),
            kind: NodeKind::File {
                content: content.to_string(),
            },
        })?;
        debug!(%id, name, "created file");
        Some(id)
    }

    /// Create an empty collapsed folder under `parent`. Same rules as
    /// [`create_file`](Self::create_file).
    pub fn create_folder(&mut self, parent: NodeId, name: &str) -> Option<NodeId> {
        let id = self.insert_child(parent, |id, parent| FileNode {
            id,
            name: name.to_string(),
            parent: Some(parent),
            kind: NodeKind::Folder {
                children: Vec::new(),
                is_expanded: false,
            },
        })?;
        debug!(%id, name, "created folder");
        Some(id)
    }

    fn insert_child(
        &mut self,
        parent: NodeId,
        build: impl FnOnce(NodeId, NodeId) -> FileNode,
    ) -> Option<NodeId> {
        if !self.find(parent).map(FileNode::is_folder).unwrap_or(false) {
            return None;
        }
        let id = self.alloc_id();
        let node = build(id, parent);
        let parent_node = self.find_mut(parent)?;
        if let NodeKind::Folder {
            children,
            is_expanded,
        } = &mut parent_node.kind
        {
            children.push(node);
            *is_expanded = true;
        }
        Some(id)
    }

    /// Rename a node. No-op if the trimmed name is empty or unchanged.
    /// Sibling name collisions are not rejected.
    pub fn rename(&mut self, id: NodeId, new_name: &str) -> bool {
        let trimmed = new_name.trim();
        if trimmed.is_empty() {
            return false;
        }
        match self.find_mut(id) {
            Some(node) if node.name != trimmed => {
                debug!(%id, from = %node.name, to = trimmed, "renamed node");
                node.name = trimmed.to_string();
                true
            }
            _ => false,
        }
    }

    /// Replace a file node's stored text. No-op for folders and unknown ids.
    pub fn set_content(&mut self, id: NodeId, content: &str) -> bool {
        match self.find_mut(id) {
            Some(FileNode {
                kind: NodeKind::File { content: stored },
                ..
            }) => {
                *stored = content.to_string();
                true
            }
            _ => false,
        }
    }

    /// Detach a node (and its whole subtree) from wherever it sits.
    /// The root cannot be removed.
    pub fn remove(&mut self, id: NodeId) -> Option<FileNode> {
        if id == self.root.id {
            return None;
        }
        fn detach(node: &mut FileNode, id: NodeId) -> Option<FileNode> {
            let children = node.children_mut()?;
            if let Some(pos) = children.iter().position(|c| c.id == id) {
                return Some(children.remove(pos));
            }
            children.iter_mut().find_map(|c| detach(c, id))
        }
        let removed = detach(&mut self.root, id);
        if removed.is_some() {
            debug!(%id, "removed subtree");
        }
        removed
    }

    /// Resolve the pending clipboard entry against `target` and apply it.
    ///
    /// The effective destination is `target` if it is a folder, else the
    /// root. Copy deep-duplicates the source subtree under fresh ids and
    /// leaves the clipboard set (repeat pastes allowed). Cut re-parents the
    /// original node, ids preserved, and clears the clipboard. Empty
    /// clipboard, dangling source, or cutting a folder into its own subtree
    /// are all no-ops. Returns the id of the pasted node.
    pub fn paste(&mut self, clipboard: &mut Clipboard, target: NodeId) -> Option<NodeId> {
        let (action, source) = clipboard.pending()?;
        let dest = match self.find(target) {
            Some(node) if node.is_folder() => target,
            _ => self.root.id,
        };
        if !self.contains(source) {
            return None;
        }
        let pasted = match action {
            ClipAction::Copy => {
                let mut copy = self.find(source)?.clone();
                self.assign_fresh_ids(&mut copy, dest);
                let id = copy.id;
                self.attach(dest, copy);
                id
            }
            ClipAction::Cut => {
                // Moving a folder into its own subtree would orphan it.
                if dest == source || self.is_descendant_of(dest, source) {
                    return None;
                }
                let mut node = self.remove(source)?;
                node.parent = Some(dest);
                let id = node.id;
                self.attach(dest, node);
                clipboard.clear();
                id
            }
        };
        debug!(source = %source, dest = %dest, ?action, "pasted node");
        Some(pasted)
    }

    /// Re-id a detached subtree so every node gets a fresh id, preserving
    /// the tree-wide uniqueness invariant on copy-paste.
    fn assign_fresh_ids(&mut self, node: &mut FileNode, parent: NodeId) {
        node.id = self.alloc_id();
        node.parent = Some(parent);
        let id = node.id;
        if let NodeKind::Folder { children, .. } = &mut node.kind {
            for child in children {
                self.assign_fresh_ids(child, id);
            }
        }
    }

    fn attach(&mut self, dest: NodeId, node: FileNode) {
        if let Some(NodeKind::Folder {
            children,
            is_expanded,
        }) = self.find_mut(dest).map(|n| &mut n.kind)
        {
            children.push(node);
            *is_expanded = true;
        }
    }

    /// Whether `id` sits somewhere inside `ancestor`'s subtree.
    fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.parent_of(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent_of(p);
        }
        false
    }

    /// Slash-joined path from (but excluding) the root. `Some("")` for the
    /// root itself.
    pub fn path_of(&self, id: NodeId) -> Option<String> {
        if id == self.root.id {
            return Some(String::new());
        }
        let mut segments = vec![self.find(id)?.name.clone()];
        let mut current = self.parent_of(id)?;
        while current != self.root.id {
            segments.push(self.find(current)?.name.clone());
            current = self.parent_of(current)?;
        }
        segments.reverse();
        Some(segments.join("/"))
    }

    /// Every node except the root, depth-first in display order, with its
    /// root-relative path.
    pub fn paths(&self) -> Vec<PathEntry> {
        fn walk(node: &FileNode, prefix: &str, out: &mut Vec<PathEntry>) {
            for child in node.children() {
                let path = if prefix.is_empty() {
                    child.name.clone()
                } else {
                    format!("{}/{}", prefix, child.name)
                };
                out.push(PathEntry {
                    id: child.id,
                    path: path.clone(),
                    is_file: child.is_file(),
                });
                walk(child, &path, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.root, "", &mut out);
        out
    }

    /// Ids of every file inside the subtree rooted at `id` (including `id`
    /// itself when it is a file). Used to close tabs before a delete.
    pub fn file_ids_under(&self, id: NodeId) -> Vec<NodeId> {
        fn collect(node: &FileNode, out: &mut Vec<NodeId>) {
            if node.is_file() {
                out.push(node.id);
            }
            for child in node.children() {
                collect(child, out);
            }
        }
        let mut out = Vec::new();
        if let Some(node) = self.find(id) {
            collect(node, &mut out);
        }
        out
    }
}
