//! Remote key and content-type resolution.

use crate::error::{Result, SyncError};
use std::path::Path;

/// Derive the remote object key for `path` relative to `root`.
///
/// Keys always use forward slashes, so the remote layout is identical no
/// matter which platform produced it. Fails if `path` is not a descendant
/// of `root`.
pub fn remote_key(root: &Path, path: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| SyncError::InvalidPath {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        })?;

    let segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    // The root itself resolves to an empty key, which is never a valid
    // object name.
    if segments.is_empty() {
        return Err(SyncError::InvalidPath {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        });
    }

    Ok(segments.join("/"))
}

/// Look up the content type for a file from its extension alone.
///
/// Unknown extensions return `None`; the upload then carries no
/// content-type hint rather than a guessed one. The match is
/// case-insensitive and never inspects file contents.
pub fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" | "mjs" => "text/javascript",
        "json" | "map" => "application/json",
        "webmanifest" => "application/manifest+json",
        "xml" => "application/xml",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "ico" => "image/vnd.microsoft.icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "eot" => "application/vnd.ms-fontobject",
        "pdf" => "application/pdf",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "wasm" => "application/wasm",
        _ => return None,
    };
    Some(mime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    #[test]
    fn test_remote_key_single_level() {
        let key = remote_key(Path::new("/srv/site"), Path::new("/srv/site/index.html")).unwrap();
        assert_eq!(key, "index.html");
    }

    #[test]
    fn test_remote_key_nested_uses_forward_slashes() {
        let key = remote_key(
            Path::new("/srv/site"),
            Path::new("/srv/site/images/logos/dark.png"),
        )
        .unwrap();
        assert_eq!(key, "images/logos/dark.png");
    }

    #[test]
    fn test_remote_key_is_deterministic() {
        let root = PathBuf::from("/srv/site");
        let path = root.join("assets/app.js");
        let first = remote_key(&root, &path).unwrap();
        let second = remote_key(&root, &path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_remote_key_rejects_path_outside_root() {
        let err = remote_key(Path::new("/srv/site"), Path::new("/srv/other/index.html"))
            .unwrap_err();
        assert!(matches!(err, SyncError::InvalidPath { .. }));
    }

    #[test]
    fn test_remote_key_rejects_root_itself() {
        let err = remote_key(Path::new("/srv/site"), Path::new("/srv/site")).unwrap_err();
        assert!(matches!(err, SyncError::InvalidPath { .. }));
    }

    #[test]
    fn test_content_type_known_extensions() {
        assert_eq!(
            content_type_for(Path::new("index.html")),
            Some("text/html")
        );
        assert_eq!(
            content_type_for(Path::new("images/logo.png")),
            Some("image/png")
        );
        assert_eq!(content_type_for(Path::new("app.css")), Some("text/css"));
        assert_eq!(
            content_type_for(Path::new("bundle.js")),
            Some("text/javascript")
        );
        assert_eq!(
            content_type_for(Path::new("fonts/inter.woff2")),
            Some("font/woff2")
        );
    }

    #[test]
    fn test_content_type_is_case_insensitive() {
        assert_eq!(content_type_for(Path::new("PHOTO.JPG")), Some("image/jpeg"));
    }

    #[test]
    fn test_content_type_unknown_extension_is_omitted() {
        assert_eq!(content_type_for(Path::new("data.bin")), None);
        assert_eq!(content_type_for(Path::new("archive.xyz")), None);
    }

    #[test]
    fn test_content_type_no_extension_is_omitted() {
        assert_eq!(content_type_for(Path::new("LICENSE")), None);
        assert_eq!(content_type_for(Path::new(".well-known")), None);
    }
}
