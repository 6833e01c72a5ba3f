//! Import / export boundary
//!
//! The only place the workspace touches disk: seeding the starter project,
//! building a virtual tree from a real directory, and serializing effective
//! contents back out as loose files or a zip archive. Archive paths are
//! rooted at the tree's top-level folder name so the hierarchy round-trips.

use std::collections::HashMap;
use std::fs;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;
use walkdir::{DirEntry, WalkDir};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::vfs::{FileTree, NodeId};
use crate::workspace::Workspace;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("node is not a file in this workspace")]
    NotAFile,
}

const STARTER_HTML: &str = "<!DOCTYPE html>\n<html>\n<head>\n\
<link rel=\"stylesheet\" href=\"style.css\">\n</head>\n<body>\n\
<h1>Hello, playground</h1>\n<script src=\"script.js\"></script>\n\
</body>\n</html>\n";

const STARTER_CSS: &str = "body {\n  font-family: sans-serif;\n}\n";

const STARTER_JS: &str = "console.log('ready');\n";

/// The three-file playground a fresh session opens with.
pub fn starter_tree() -> FileTree {
    let mut tree = FileTree::new("playground");
    let root = tree.root_id();
    tree.create_file(root, "index.html", STARTER_HTML);
    tree.create_file(root, "style.css", STARTER_CSS);
    tree.create_file(root, "script.js", STARTER_JS);
    tree
}

fn is_ignored(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') {
        return true;
    }
    entry.file_type().is_dir()
        && matches!(
            name.as_ref(),
            "target" | "node_modules" | "__pycache__" | "dist" | "build"
        )
}

/// Build a virtual tree from a disk directory. Hidden entries and the
/// usual build/vendor directories are skipped, folders sort before files,
/// names case-insensitively. Unreadable or non-UTF-8 files are skipped.
pub fn import_dir(path: &Path) -> Result<FileTree, ProjectError> {
    let root_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "project".to_string());
    let mut tree = FileTree::new(&root_name);

    let mut ids: HashMap<PathBuf, NodeId> = HashMap::new();
    ids.insert(path.to_path_buf(), tree.root_id());

    let walker = WalkDir::new(path)
        .min_depth(1)
        .sort_by(|a, b| {
            b.file_type()
                .is_dir()
                .cmp(&a.file_type().is_dir())
                .then_with(|| {
                    a.file_name()
                        .to_string_lossy()
                        .to_lowercase()
                        .cmp(&b.file_name().to_string_lossy().to_lowercase())
                })
        })
        .into_iter()
        .filter_entry(|e| !is_ignored(e));

    for entry in walker {
        let entry = entry?;
        let Some(parent) = entry.path().parent().and_then(|p| ids.get(p)).copied() else {
            continue;
        };
        let name = entry.file_name().to_string_lossy().to_string();
        if entry.file_type().is_dir() {
            if let Some(id) = tree.create_folder(parent, &name) {
                ids.insert(entry.path().to_path_buf(), id);
            }
        } else if let Ok(content) = fs::read_to_string(entry.path()) {
            tree.create_file(parent, &name, &content);
        }
    }

    info!(root = %root_name, nodes = tree.node_count(), "imported project");
    Ok(tree)
}

/// Write one file's effective content into `dir` under the node's name
/// (the "download single file" interface). Returns the written path.
pub fn export_file(ws: &Workspace, id: NodeId, dir: &Path) -> Result<PathBuf, ProjectError> {
    let node = ws.tree().find(id).filter(|n| n.is_file()).ok_or(ProjectError::NotAFile)?;
    let content = ws.effective_content(id).ok_or(ProjectError::NotAFile)?;
    let target = dir.join(&node.name);
    fs::write(&target, content)?;
    info!(path = %target.display(), "exported file");
    Ok(target)
}

/// Serialize every file node's effective content into a zip archive,
/// hierarchy preserved, rooted at the tree's top-level folder name.
pub fn export_archive<W: Write + Seek>(ws: &Workspace, writer: W) -> Result<(), ProjectError> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default();
    let root_name = ws.tree().root().name.clone();

    zip.add_directory(format!("{}/", root_name), options)?;
    for entry in ws.tree().paths() {
        let archive_path = format!("{}/{}", root_name, entry.path);
        if entry.is_file {
            let content = ws.effective_content(entry.id).unwrap_or_default();
            zip.start_file(archive_path, options)?;
            zip.write_all(content.as_bytes())?;
        } else {
            zip.add_directory(format!("{}/", archive_path), options)?;
        }
    }
    zip.finish()?;
    info!(root = %root_name, "exported project archive");
    Ok(())
}

/// Convenience wrapper that creates the archive file on disk.
pub fn export_archive_to(ws: &Workspace, path: &Path) -> Result<(), ProjectError> {
    let file = fs::File::create(path)?;
    export_archive(ws, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    #[test]
    fn test_starter_tree_shape() {
        let tree = starter_tree();
        assert_eq!(tree.root().name, "playground");
        let names: Vec<&str> = tree.root().children().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["index.html", "style.css", "script.js"]);
    }

    #[test]
    fn test_import_dir_builds_matching_tree() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/a.js"), "x=1").unwrap();
        fs::write(dir.path().join("readme.md"), "hello").unwrap();
        fs::write(dir.path().join(".hidden"), "skip me").unwrap();
        fs::create_dir(dir.path().join("node_modules")).unwrap();
        fs::write(dir.path().join("node_modules/dep.js"), "skip me").unwrap();

        let tree = import_dir(dir.path()).unwrap();
        // root + src + a.js + readme.md
        assert_eq!(tree.node_count(), 4);
        let top: Vec<&str> = tree.root().children().iter().map(|c| c.name.as_str()).collect();
        // Folders sort before files.
        assert_eq!(top, vec!["src", "readme.md"]);
        let paths: Vec<String> = tree.paths().into_iter().map(|e| e.path).collect();
        assert!(paths.contains(&"src/a.js".to_string()));
    }

    #[test]
    fn test_export_file_uses_effective_content() {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = Workspace::new(starter_tree());
        let js = ws
            .tree()
            .paths()
            .into_iter()
            .find(|e| e.path == "script.js")
            .unwrap()
            .id;
        ws.select_file(js);
        ws.edit_active("console.log('edited');");

        let written = export_file(&ws, js, dir.path()).unwrap();
        assert_eq!(fs::read_to_string(written).unwrap(), "console.log('edited');");
    }

    #[test]
    fn test_export_file_rejects_folders() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::new(starter_tree());
        let root = ws.tree().root_id();
        assert!(matches!(
            export_file(&ws, root, dir.path()),
            Err(ProjectError::NotAFile)
        ));
    }

    #[test]
    fn test_archive_round_trips_paths_and_contents() {
        let mut tree = starter_tree();
        let root = tree.root_id();
        let src = tree.create_folder(root, "src").unwrap();
        tree.create_file(src, "a.js", "x=1");
        tree.create_folder(root, "empty");
        let ws = Workspace::new(tree);

        let mut buf = Cursor::new(Vec::new());
        export_archive(&ws, &mut buf).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(buf.into_inner())).unwrap();
        let mut content = String::new();
        archive
            .by_name("playground/src/a.js")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "x=1");
        assert!(archive.by_name("playground/index.html").is_ok());
        assert!(archive.by_name("playground/empty/").is_ok());
    }

    #[test]
    fn test_archive_prefers_open_tab_content() {
        let mut ws = Workspace::new(starter_tree());
        let css = ws
            .tree()
            .paths()
            .into_iter()
            .find(|e| e.path == "style.css")
            .unwrap()
            .id;
        ws.select_file(css);
        ws.edit_active("body { margin: 0; }");

        let mut buf = Cursor::new(Vec::new());
        export_archive(&ws, &mut buf).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(buf.into_inner())).unwrap();
        let mut content = String::new();
        archive
            .by_name("playground/style.css")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "body { margin: 0; }");
    }
}
