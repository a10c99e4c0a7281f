//! Filename handling shared by the validator and the writers.
//!
//! ## Extensions
//!
//! Format checks look only at the extension of the *declared* filename,
//! never at the bytes. Extensions are compared lower-cased and without the
//! leading dot, so `IMAGE.JPG`, `image.jpg` and a configured `".jpg"` all
//! agree. Dotfiles like `.png` have no extension.
//!
//! ## Output formats
//!
//! A format override is spelled the way a user would type it (`"jpeg"`,
//! `"JPG"`, `".png"`). It selects the codec only; the output filename is left
//! exactly as given.

use image::ImageFormat;
use std::path::{Component, Path};

/// Normalize a configured or declared extension: trim, strip leading dots,
/// lower-case.
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}

/// Lower-cased extension of a filename, without the dot.
///
/// - `"photo.JPG"` → `Some("jpg")`
/// - `"archive.tar.gz"` → `Some("gz")`
/// - `".png"` → `None`
/// - `"README"` → `None`
pub fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(normalize_extension)
        .filter(|e| !e.is_empty())
}

/// Final path component as a UTF-8 string, if there is one.
pub fn file_name_of(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

/// `name` if it is a single plain path component, so joining it onto an
/// output directory stays inside that directory.
///
/// - `"photo.png"` → `Some("photo.png")`
/// - `"../photo.png"`, `"/tmp/photo.png"`, `"a/photo.png"`, `".."` → `None`
pub fn plain_file_name(name: &str) -> Option<&str> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Some(name),
        _ => None,
    }
}

/// Parse a user-facing format name into an encoder format.
pub fn parse_format(name: &str) -> Option<ImageFormat> {
    let ext = normalize_extension(name);
    if ext.is_empty() {
        return None;
    }
    ImageFormat::from_extension(ext)
}
