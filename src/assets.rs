//! Static assets: logos and celebration media
//!
//! Assets live in a flat directory next to the dashboard (`assets/` by
//! default). Logos are discovered by name when the config does not list them.
//!
//! The served page links assets under `/assets/`. A dashboard written to a
//! file links them by absolute `file://` URL, so it works wherever it is saved.

use log::debug;
use std::path::{Component, Path, PathBuf};
use url::Url;
use walkdir::WalkDir;

/// Image extensions accepted as logos
const LOGO_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp"];

/// Files in `dir` whose stem starts with `logo`, sorted by file name
pub fn discover_logos<P: AsRef<Path>>(dir: P) -> Vec<String> {
    let mut logos: Vec<String> = WalkDir::new(dir.as_ref())
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let path = e.path();
            let is_logo = path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(|s| s.to_ascii_lowercase().starts_with("logo"))
                .unwrap_or(false);
            let is_image = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| LOGO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false);
            is_logo && is_image
        })
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .collect();

    logos.sort();
    debug!("Discovered {} logo(s) in {}", logos.len(), dir.as_ref().display());
    logos
}

/// Map a request path below `/assets/` to a file inside `dir`
///
/// Returns `None` for empty, absolute or parent-escaping paths.
pub fn resolve<P: AsRef<Path>>(dir: P, request_path: &str) -> Option<PathBuf> {
    let relative = Path::new(request_path);
    if request_path.is_empty() {
        return None;
    }
    let safe = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if !safe {
        return None;
    }
    Some(dir.as_ref().join(relative))
}

/// How the dashboard page refers to files in the assets directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetLinks {
    /// Page served over HTTP, assets under `/assets/`
    Served,
    /// Standalone file, assets linked by absolute path
    Directory(PathBuf),
}

impl AssetLinks {
    /// Links for a dashboard file, resolving a relative `assets_dir`
    /// against the working directory
    pub fn for_file<P: AsRef<Path>>(assets_dir: P) -> Self {
        let dir = assets_dir.as_ref();
        let absolute = match dir.canonicalize() {
            Ok(path) => path,
            Err(_) if dir.is_absolute() => dir.to_path_buf(),
            Err(_) => std::env::current_dir()
                .map(|cwd| cwd.join(dir))
                .unwrap_or_else(|_| dir.to_path_buf()),
        };
        AssetLinks::Directory(absolute)
    }

    pub fn url(&self, name: &str) -> String {
        match self {
            AssetLinks::Served => format!("assets/{}", name),
            AssetLinks::Directory(dir) => {
                let path = dir.join(name);
                match Url::from_file_path(&path) {
                    Ok(url) => url.to_string(),
                    // Only reachable if the directory could not be made absolute
                    Err(()) => path.to_string_lossy().into_owned(),
                }
            }
        }
    }
}

pub fn content_type<P: AsRef<Path>>(path: P) -> &'static str {
    let ext = path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "html" | "htm" => "text/html",
        _ => "application/octet-stream",
    }
}
