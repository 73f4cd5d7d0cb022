//! Locating tool inputs under an evidence root.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

/// Resolve a found path like the tools expect it: absolute, links followed,
/// and without the `\\?\` verbatim prefix on Windows
fn resolve(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Entries below `source` (sorted walk, root excluded) accepted by `predicate`
fn matching<P>(source: &Path, predicate: P) -> impl Iterator<Item = DirEntry>
where
    P: Fn(&DirEntry) -> bool,
{
    WalkDir::new(source)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(move |entry| predicate(entry))
}

fn find_first<P>(source: &Path, predicate: P) -> Option<PathBuf>
where
    P: Fn(&DirEntry) -> bool,
{
    matching(source, predicate).next().map(|entry| resolve(entry.path()))
}

/// First regular file whose name is exactly `name`
pub fn find_file_named(source: &Path, name: &str) -> Option<PathBuf> {
    find_first(source, |entry| {
        entry.file_type().is_file() && entry.file_name().to_string_lossy() == name
    })
}

/// Last regular file, in walk order, whose name ends in `suffix` (`*$MFT`)
pub fn find_last_file_ending_with(source: &Path, suffix: &str) -> Option<PathBuf> {
    matching(source, |entry| {
        entry.file_type().is_file() && entry.file_name().to_string_lossy().ends_with(suffix)
    })
    .last()
    .map(|entry| resolve(entry.path()))
}

/// First directory whose name equals `name`, ignoring case
pub fn find_dir_named_ignore_case(source: &Path, name: &str) -> Option<PathBuf> {
    find_first(source, |entry| {
        entry.file_type().is_dir() && entry.file_name().to_string_lossy().eq_ignore_ascii_case(name)
    })
}

/// Directory holding the first `*.evtx` file found
pub fn find_evtx_dir(source: &Path) -> Option<PathBuf> {
    find_first(source, |entry| {
        entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .map(|ext| ext == "evtx")
                .unwrap_or(false)
    })
    .and_then(|evtx| evtx.parent().map(Path::to_path_buf))
    .filter(|dir| dir.exists())
}
