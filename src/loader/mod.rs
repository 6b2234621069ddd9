//! Asynchronous glTF model loading.
//!
//! A load reports zero or more [`LoadEvent::Progress`] fractions followed by
//! exactly one terminal event, [`LoadEvent::Loaded`] or
//! [`LoadEvent::Failed`]. Natively the load runs on a named background
//! thread reading from the filesystem; in the browser it runs as a
//! `spawn_local` task over `fetch`.

/// glTF document to [`Model`](crate::model::Model) conversion.
pub mod document;
/// Filesystem loader on a background thread.
#[cfg(not(target_arch = "wasm32"))]
pub mod native;
/// `fetch`-based loader for the browser.
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use document::{decode_image, image_from_gltf, model_from_document};
#[cfg(not(target_arch = "wasm32"))]
pub use native::{load_from_path, spawn_load};
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web::load_from_url;

use crate::error::ViewerError;
use crate::model::Model;

/// One step of a model load.
#[derive(Debug)]
pub enum LoadEvent {
    /// Fraction of the source loaded so far, in `[0, 1]`.
    Progress(f32),
    /// The model is ready to upload.
    Loaded(Model),
    /// The load failed; no further events follow.
    Failed(ViewerError),
}

impl LoadEvent {
    /// Whether this event ends the load.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress(_))
    }
}

/// Progress as a fraction, guarding against an unknown or empty total.
pub(crate) fn fraction(loaded: u64, total: u64) -> f32 {
    if total == 0 {
        return 1.0;
    }
    (loaded as f64 / total as f64).clamp(0.0, 1.0) as f32
}

/// Everything up to and including the last `/` of `url`'s path, without
/// any query or fragment. Empty when the path has no `/`.
#[must_use]
pub fn base_url(url: &str) -> String {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    let path = &url[..end];
    match path.rfind('/') {
        Some(slash) => path[..=slash].to_owned(),
        None => String::new(),
    }
}

/// Resolve a glTF `uri` against a base from [`base_url`].
///
/// URIs with a scheme (`https:`, `data:`, ...) are returned unchanged.
/// `//host/path` keeps the base's scheme and `/path` keeps its origin.
/// Anything else is appended to the base.
#[must_use]
pub fn resolve_uri(base: &str, uri: &str) -> String {
    if has_scheme(uri) {
        return uri.to_owned();
    }
    let scheme_end = base.find("://");
    if let Some(rest) = uri.strip_prefix("//") {
        let scheme = scheme_end.map_or("", |i| &base[..=i]);
        return format!("{scheme}//{rest}");
    }
    if let Some(rest) = uri.strip_prefix('/') {
        let origin_end = scheme_end
            .and_then(|i| base[i + 3..].find('/').map(|j| i + 3 + j))
            .unwrap_or(base.len());
        return format!("{}/{rest}", &base[..origin_end]);
    }
    format!("{base}{uri}")
}

/// `scheme ":"` where the scheme is a letter followed by letters, digits,
/// `+`, `-` or `.`.
fn has_scheme(uri: &str) -> bool {
    let Some(colon) = uri.find(':') else {
        return false;
    };
    let scheme = &uri[..colon];
    scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_is_clamped() {
        assert_eq!(fraction(50, 200), 0.25);
        assert_eq!(fraction(300, 200), 1.0);
        assert_eq!(fraction(0, 0), 1.0);
    }

    #[test]
    fn only_progress_is_non_terminal() {
        assert!(!LoadEvent::Progress(0.5).is_terminal());
        assert!(LoadEvent::Loaded(Model::default()).is_terminal());
        assert!(LoadEvent::Failed(ViewerError::ModelLoad(String::new()))
            .is_terminal());
    }

    #[test]
    fn base_url_strips_file_query_and_fragment() {
        assert_eq!(
            base_url("https://example.com/models/castle/scene.gltf?v=2#top"),
            "https://example.com/models/castle/"
        );
        assert_eq!(
            base_url("https://example.com/app/?model=dino"),
            "https://example.com/app/"
        );
        assert_eq!(
            base_url("https://example.com/a/b?next=/c/d"),
            "https://example.com/a/"
        );
        assert_eq!(base_url("scene.gltf"), "");
    }

    #[test]
    fn relative_uris_append_to_the_base() {
        let base = "https://example.com/models/castle/";
        assert_eq!(
            resolve_uri(base, "scene.bin"),
            "https://example.com/models/castle/scene.bin"
        );
        assert_eq!(
            resolve_uri(base, "textures/Material%20base.png"),
            "https://example.com/models/castle/textures/Material%20base.png"
        );
        assert_eq!(resolve_uri("", "scene.bin"), "scene.bin");
    }

    #[test]
    fn rooted_uris_keep_scheme_or_origin() {
        let base = "https://example.com/models/castle/";
        assert_eq!(
            resolve_uri(base, "/assets/scene.bin"),
            "https://example.com/assets/scene.bin"
        );
        assert_eq!(
            resolve_uri(base, "//cdn.example.org/scene.bin"),
            "https://cdn.example.org/scene.bin"
        );
        assert_eq!(
            resolve_uri("https://example.com", "/scene.bin"),
            "https://example.com/scene.bin"
        );
    }

    #[test]
    fn uris_with_a_scheme_are_untouched() {
        let base = "https://example.com/models/";
        for uri in [
            "http://other.org/scene.bin",
            "data:application/octet-stream;base64,AAAA",
            "blob:https://example.com/1234",
        ] {
            assert_eq!(resolve_uri(base, uri), uri);
        }
    }
}
