//! Filesystem-backed category and image listing
//!
//! Categories are the per-diagnosis directories the image downloader
//! creates under the data root (`downloaded_images/<diagnosis>/<file>`).
//! Directory names use underscores; display names map them back to spaces.

use serde::Serialize;
use std::path::{Path, PathBuf};

const VALID_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp"];

/// One diagnosis category (a directory of images)
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    /// Directory name, used in URLs
    pub id: String,
    /// Human-readable name (underscores replaced by spaces)
    pub name: String,
}

/// One image file within a category
#[derive(Debug, Clone, Serialize)]
pub struct ImageEntry {
    pub filename: String,
    /// URL path the web UI uses to fetch the image
    pub path: String,
    pub category_id: String,
}

/// Listing over the downloaded images directory
pub struct ImageLibrary {
    root: PathBuf,
}

impl ImageLibrary {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// All categories, sorted by display name; empty when the root is absent
    pub fn categories(&self) -> Vec<Category> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut categories: Vec<Category> = entries
            .flatten()
            .filter(|e| e.path().is_dir())
            .filter_map(|e| {
                let id = e.file_name().to_str()?.to_string();
                let name = id.replace('_', " ");
                Some(Category { id, name })
            })
            .collect();

        categories.sort_by(|a, b| a.name.cmp(&b.name));
        categories
    }

    /// Category by directory name, if it exists
    pub fn category_by_id(&self, category_id: &str) -> Option<Category> {
        self.categories().into_iter().find(|c| c.id == category_id)
    }

    /// Image files in one category, sorted by filename
    pub fn images_in_category(&self, category_id: &str) -> Vec<ImageEntry> {
        let dir = self.root.join(category_id);
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut images: Vec<ImageEntry> = entries
            .flatten()
            .filter(|e| e.path().is_file())
            .filter_map(|e| {
                let filename = e.file_name().to_str()?.to_string();
                if !has_valid_extension(&filename) {
                    return None;
                }
                Some(ImageEntry {
                    path: format!("/images/{}/{}", category_id, filename),
                    filename,
                    category_id: category_id.to_string(),
                })
            })
            .collect();

        images.sort_by(|a, b| a.filename.cmp(&b.filename));
        images
    }

    /// Category containing the given filename, scanning all categories
    pub fn find_category_of(&self, filename: &str) -> Option<Category> {
        self.categories().into_iter().find(|c| {
            self.images_in_category(&c.id)
                .iter()
                .any(|img| img.filename == filename)
        })
    }

    /// Absolute path of one image file, refusing path traversal
    ///
    /// Both components must be plain file names; anything containing a
    /// separator or `..` is rejected.
    pub fn image_path(&self, category_id: &str, filename: &str) -> Option<PathBuf> {
        if !is_plain_name(category_id) || !is_plain_name(filename) {
            return None;
        }
        let path = self.root.join(category_id).join(filename);
        if path.is_file() {
            Some(path)
        } else {
            None
        }
    }
}

fn has_valid_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| VALID_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn is_plain_name(component: &str) -> bool {
    !component.is_empty()
        && component != ".."
        && component != "."
        && !component.contains(['/', '\\'])
}
