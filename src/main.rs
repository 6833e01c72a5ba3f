use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use webpen::{load_config, preview, project, FileNode, Workspace};

fn main() -> anyhow::Result<()> {
    let _log_guard = webpen::logging::init();
    let settings = load_config();

    // Import a project directory if given, otherwise seed the starter
    // playground.
    let tree = match env::args().nth(1) {
        Some(dir) => project::import_dir(Path::new(&dir))?,
        None => project::starter_tree(),
    };
    let mut ws = Workspace::new(tree);

    println!("{}", ws.tree().root().name);
    print_tree(ws.tree().root(), 1);

    // Pick the configured entry document, falling back to the first file.
    let entry = ws
        .tree()
        .paths()
        .into_iter()
        .find(|e| e.is_file && e.path.rsplit('/').next() == Some(settings.preview.entry_file.as_str()))
        .or_else(|| ws.tree().paths().into_iter().find(|e| e.is_file));
    let Some(entry) = entry else {
        anyhow::bail!("project contains no files to run");
    };
    ws.select_file(entry.id);

    let document = preview::run(&ws, entry.id, &settings.preview);

    let out_dir = env::args().nth(2).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("webpen-out"));
    fs::create_dir_all(&out_dir)?;

    let preview_path = out_dir.join("preview.html");
    fs::write(&preview_path, document)?;
    println!("preview: {}", preview_path.display());

    let archive_path = out_dir.join(&settings.export.archive_name);
    project::export_archive_to(&ws, &archive_path)?;
    println!("archive: {}", archive_path.display());

    Ok(())
}

fn print_tree(node: &FileNode, depth: usize) {
    for child in node.children() {
        let marker = if child.is_folder() { "/" } else { "" };
        println!("{}{}{}", "  ".repeat(depth), child.name, marker);
        print_tree(child, depth + 1);
    }
}
