use crate::vfs::NodeId;

/// An editor tab bound to one file node.
///
/// The tree holds the durable copy of the text; the tab holds the working
/// copy plus a "touched since open" flag. Edits are mirrored into the tree
/// immediately, so `dirty` is bookkeeping only and closing a tab never
/// loses data.
#[derive(Debug, Clone)]
pub struct OpenTab {
    pub file: NodeId,
    /// Cached from the node's name at open time, refreshed on rename.
    pub display_name: String,
    pub working_content: String,
    pub dirty: bool,
}

/// The ordered set of open tabs plus the active one. At most one tab
/// exists per file id.
#[derive(Debug, Clone, Default)]
pub struct TabStrip {
    tabs: Vec<OpenTab>,
    active: Option<NodeId>,
}

impl TabStrip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OpenTab> {
        self.tabs.iter()
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn active(&self) -> Option<NodeId> {
        self.active
    }

    pub fn active_tab(&self) -> Option<&OpenTab> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn contains(&self, file: NodeId) -> bool {
        self.tabs.iter().any(|t| t.file == file)
    }

    pub fn get(&self, file: NodeId) -> Option<&OpenTab> {
        self.tabs.iter().find(|t| t.file == file)
    }

    pub fn get_mut(&mut self, file: NodeId) -> Option<&mut OpenTab> {
        self.tabs.iter_mut().find(|t| t.file == file)
    }

    /// Append a tab and make it active. Callers must check `contains`
    /// first; the strip never holds two tabs for one file.
    pub fn open(&mut self, tab: OpenTab) {
        self.active = Some(tab.file);
        self.tabs.push(tab);
    }

    /// Activate an existing tab. Returns false if no tab is open for `file`.
    pub fn activate(&mut self, file: NodeId) -> bool {
        if self.contains(file) {
            self.active = Some(file);
            true
        } else {
            false
        }
    }

    /// Remove the tab for `file`. If it was active, activation falls to the
    /// most recently opened remaining tab, or to none.
    pub fn close(&mut self, file: NodeId) -> bool {
        let Some(pos) = self.tabs.iter().position(|t| t.file == file) else {
            return false;
        };
        self.tabs.remove(pos);
        if self.active == Some(file) {
            self.active = self.tabs.last().map(|t| t.file);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::FileTree;

    fn tab(file: NodeId, name: &str) -> OpenTab {
        OpenTab {
            file,
            display_name: name.to_string(),
            working_content: String::new(),
            dirty: false,
        }
    }

    fn three_files() -> (NodeId, NodeId, NodeId) {
        let mut tree = FileTree::new("project");
        let a = tree.create_file(tree.root_id(), "a.js", "").unwrap();
        let b = tree.create_file(tree.root_id(), "b.js", "").unwrap();
        let c = tree.create_file(tree.root_id(), "c.js", "").unwrap();
        (a, b, c)
    }

    #[test]
    fn test_open_activates() {
        let (a, b, _) = three_files();
        let mut strip = TabStrip::new();
        strip.open(tab(a, "a.js"));
        strip.open(tab(b, "b.js"));
        assert_eq!(strip.active(), Some(b));
        assert_eq!(strip.len(), 2);
    }

    #[test]
    fn test_close_active_falls_back_to_last_opened() {
        let (a, b, c) = three_files();
        let mut strip = TabStrip::new();
        strip.open(tab(a, "a.js"));
        strip.open(tab(b, "b.js"));
        strip.open(tab(c, "c.js"));
        strip.close(c);
        assert_eq!(strip.active(), Some(b));
        // Closing an inactive tab leaves activation alone.
        strip.close(a);
        assert_eq!(strip.active(), Some(b));
        strip.close(b);
        assert_eq!(strip.active(), None);
        assert!(strip.is_empty());
    }

    #[test]
    fn test_close_unknown_is_noop() {
        let (a, b, _) = three_files();
        let mut strip = TabStrip::new();
        strip.open(tab(a, "a.js"));
        assert!(!strip.close(b));
        assert_eq!(strip.len(), 1);
    }
}
