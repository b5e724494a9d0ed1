#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use merge_move::Options;

/// What a tree entry looks like, without following symlinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Dir,
    File(Vec<u8>),
    Symlink(PathBuf),
}

/// Map of every entry under `root` (relative path -> node), root excluded.
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, Node> {
    WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .map(|e| e.expect("walk"))
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap().to_path_buf();
            let ft = e.file_type();
            let node = if ft.is_symlink() {
                Node::Symlink(fs::read_link(e.path()).unwrap())
            } else if ft.is_dir() {
                Node::Dir
            } else {
                Node::File(fs::read(e.path()).unwrap())
            };
            (rel, node)
        })
        .collect()
}

/// Write `contents` to `path`, creating parent directories.
pub fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

pub fn options(workers: usize, buffer: usize) -> Options {
    Options {
        workers,
        queue_capacity: buffer,
        ..Options::default()
    }
}

/// Fresh `src` and `dst` directories under one temp root.
pub fn roots() -> (tempfile::TempDir, PathBuf, PathBuf) {
    let td = tempfile::tempdir().unwrap();
    let src = td.path().join("src");
    let dst = td.path().join("dst");
    fs::create_dir(&src).unwrap();
    fs::create_dir(&dst).unwrap();
    (td, src, dst)
}
