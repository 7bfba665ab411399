//! Sample photo and background listings.

use crate::imaging::codec::supported_input_extensions;
use std::fs;
use std::io;
use std::path::Path;

/// File names of the images directly inside `dir`, sorted.
///
/// Hidden files and subdirectories are skipped. A directory that does not
/// exist is simply empty.
pub fn list_images(dir: &Path) -> io::Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| is_image(p))
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .filter(|name| !name.starts_with('.'))
        .collect();

    names.sort();
    Ok(names)
}

fn is_image(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    supported_input_extensions().contains(&ext.as_str())
}
