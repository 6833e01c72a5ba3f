//! Editor session state
//!
//! One `Workspace` per UI session: it owns the virtual file tree, the open
//! tab strip, the copy/cut clipboard, and the preview console log. All
//! operations are synchronous and single-owner; there is no shared state
//! and nothing to lock.

pub mod tab;

use tracing::debug;

use crate::preview::console::ConsoleLog;
use crate::vfs::{Clipboard, FileTree, NodeId};

pub use tab::{OpenTab, TabStrip};

pub struct Workspace {
    tree: FileTree,
    tabs: TabStrip,
    clipboard: Clipboard,
    console: ConsoleLog,
}

impl Workspace {
    pub fn new(tree: FileTree) -> Self {
        Self {
            tree,
            tabs: TabStrip::new(),
            clipboard: Clipboard::new(),
            console: ConsoleLog::new(),
        }
    }

    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut FileTree {
        &mut self.tree
    }

    pub fn tabs(&self) -> &TabStrip {
        &self.tabs
    }

    pub fn console(&self) -> &ConsoleLog {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut ConsoleLog {
        &mut self.console
    }

    /// Select a file in the explorer. Activates the existing tab if one is
    /// open (at most one tab per file), otherwise opens a new tab seeded
    /// with the tree's current content. Folders and unknown ids are no-ops
    /// here — expansion is the tree's job.
    pub fn select_file(&mut self, id: NodeId) {
        if self.tabs.activate(id) {
            return;
        }
        let Some(node) = self.tree.find(id) else {
            return;
        };
        let Some(content) = node.content() else {
            return;
        };
        debug!(%id, name = %node.name, "opened tab");
        self.tabs.open(OpenTab {
            file: id,
            display_name: node.name.clone(),
            working_content: content.to_string(),
            dirty: false,
        });
    }

    /// Replace the active tab's working copy and mirror the text into the
    /// tree node immediately. The tree stays the durable copy; `dirty` only
    /// records that the tab has been touched since open.
    pub fn edit_active(&mut self, new_content: &str) {
        let Some(id) = self.tabs.active() else {
            return;
        };
        if let Some(tab) = self.tabs.get_mut(id) {
            tab.working_content = new_content.to_string();
            tab.dirty = true;
        }
        self.tree.set_content(id, new_content);
    }

    /// Close the tab for `id`. If it was active, activation falls to the
    /// most recently opened remaining tab. Never loses edits — they are
    /// already mirrored into the tree.
    pub fn close_tab(&mut self, id: NodeId) {
        self.tabs.close(id);
    }

    /// The most current text for a file: the open tab's working copy if a
    /// tab exists, else the tree's stored content. `None` for folders and
    /// unknown ids.
    pub fn effective_content(&self, id: NodeId) -> Option<&str> {
        if let Some(tab) = self.tabs.get(id) {
            return Some(&tab.working_content);
        }
        self.tree.find(id).and_then(|n| n.content())
    }

    /// Rename a tree node and refresh the display name of its open tab, if
    /// any.
    pub fn rename_node(&mut self, id: NodeId, new_name: &str) {
        if !self.tree.rename(id, new_name) {
            return;
        }
        if let Some(node) = self.tree.find(id) {
            let name = node.name.clone();
            if let Some(tab) = self.tabs.get_mut(id) {
                tab.display_name = name;
            }
        }
    }

    /// Delete a node and its subtree, closing any tabs open on files inside
    /// it first.
    pub fn delete_node(&mut self, id: NodeId) {
        for file in self.tree.file_ids_under(id) {
            self.tabs.close(file);
        }
        self.tree.remove(id);
    }

    /// Stage a node for copy. Pure state capture, no tree mutation.
    pub fn copy(&mut self, id: NodeId) {
        self.clipboard.stage_copy(id);
    }

    /// Stage a node for cut. Pure state capture, no tree mutation.
    pub fn cut(&mut self, id: NodeId) {
        self.clipboard.stage_cut(id);
    }

    /// Apply the pending clipboard entry against `target`. See
    /// [`FileTree::paste`] for the resolution rules. Tabs stay valid: cut
    /// preserves ids and copy mints fresh ones.
    pub fn paste(&mut self, target: NodeId) -> Option<NodeId> {
        self.tree.paste(&mut self.clipboard, target)
    }

    /// Feed one raw message from the preview surface into the console log.
    /// Anything that is not a well-formed console message is ignored.
    pub fn receive_preview_message(&mut self, raw: &str) {
        self.console.receive_raw(raw);
    }
}
