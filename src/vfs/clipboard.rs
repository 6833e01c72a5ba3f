use super::NodeId;

/// What a paste should do with the staged node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipAction {
    /// Duplicate the subtree under fresh ids; staging survives the paste.
    Copy,
    /// Move the subtree; staging is consumed by the paste.
    Cut,
}

/// Single-slot copy/cut clipboard.
///
/// Staging is pure state capture — no tree mutation happens until paste.
/// A new copy or cut overwrites any prior pending entry.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    pending: Option<(ClipAction, NodeId)>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage_copy(&mut self, node: NodeId) {
        self.pending = Some((ClipAction::Copy, node));
    }

    pub fn stage_cut(&mut self, node: NodeId) {
        self.pending = Some((ClipAction::Cut, node));
    }

    pub fn pending(&self) -> Option<(ClipAction, NodeId)> {
        self.pending
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::FileTree;

    #[test]
    fn test_staging_overwrites_prior_entry() {
        let mut tree = FileTree::new("project");
        let a = tree.create_file(tree.root_id(), "a.js", "").unwrap();
        let b = tree.create_file(tree.root_id(), "b.js", "").unwrap();

        let mut clipboard = Clipboard::new();
        clipboard.stage_copy(a);
        clipboard.stage_cut(b);
        assert_eq!(clipboard.pending(), Some((ClipAction::Cut, b)));
    }

    #[test]
    fn test_clear_empties_slot() {
        let mut tree = FileTree::new("project");
        let a = tree.create_file(tree.root_id(), "a.js", "").unwrap();

        let mut clipboard = Clipboard::new();
        assert!(clipboard.is_empty());
        clipboard.stage_copy(a);
        assert!(!clipboard.is_empty());
        clipboard.clear();
        assert!(clipboard.is_empty());
    }
}
