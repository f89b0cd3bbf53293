use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use crate::scan::MediaReference;

/// A reference whose file was uploaded, with the URI the content store assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub reference: MediaReference,
    pub absolute_path: PathBuf,
    pub remote_uri: String,
}

/// Directory that reference paths are resolved against.
///
/// A bare file name has an empty parent; that means the current directory.
pub fn document_dir(document: &Path) -> PathBuf {
    match document.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Locate the file a reference points at, relative to the document's directory.
///
/// Site-root paths such as `/img/a.png` are still taken relative to the
/// document directory; a reference never escapes to the filesystem root.
///
/// Returns `None` (after logging) when no regular file exists there; the
/// caller leaves that reference untouched and moves on.
pub fn resolve_reference(document_dir: &Path, reference: &MediaReference) -> Option<PathBuf> {
    let candidate = join_under(document_dir, Path::new(&reference.path));
    if candidate.is_file() {
        debug!(path = %candidate.display(), "Resolved media reference to local file");
        Some(candidate)
    } else {
        warn!(
            path = %candidate.display(),
            tag = %reference.original_tag,
            "File not found, leaving reference unchanged"
        );
        None
    }
}

/// Join `relative` onto `base`, dropping any root or drive prefix from
/// `relative` so the result always starts at `base`.
fn join_under(base: &Path, relative: &Path) -> PathBuf {
    relative
        .components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .fold(base.to_path_buf(), |mut acc, c| {
            acc.push(c);
            acc
        })
}
