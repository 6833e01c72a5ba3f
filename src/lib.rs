pub mod config;
pub mod logging;
pub mod preview;
pub mod project;
pub mod vfs;
pub mod workspace;

pub use config::{load_config, PreviewSettings, Settings};
pub use vfs::{ClipAction, Clipboard, FileNode, FileTree, NodeId, NodeKind};
pub use workspace::{OpenTab, TabStrip, Workspace};
