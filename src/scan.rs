//! Discovery of media references in raw markdown.
//!
//! Four pattern families are scanned independently and their matches are
//! concatenated family by family. A tag matched by two families (for example
//! `![clip](demo.mp4)`, which is both a markdown image and a video link)
//! yields two references; nothing is deduplicated.

use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, warn};

/// The pattern family that produced a [`MediaReference`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// `![alt](path)`
    MarkdownImage,
    /// `<img ... src="path">`
    HtmlImage,
    /// `<video ... src="path">` or `<source ... src="path">`
    HtmlVideo,
    /// `[label](path.mp4)`, also `.webm` and `.ogg`
    MarkdownVideoLink,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReferenceKind::MarkdownImage => "markdown image",
            ReferenceKind::HtmlImage => "html image",
            ReferenceKind::HtmlVideo => "html video",
            ReferenceKind::MarkdownVideoLink => "markdown video link",
        };
        f.write_str(name)
    }
}

/// One textual pointer at a local media file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaReference {
    /// The full matched tag, exactly as it appears in the document.
    pub original_tag: String,
    /// The referenced path, as written inside the tag.
    pub path: String,
    pub kind: ReferenceKind,
}

struct Family {
    kind: ReferenceKind,
    regex: &'static LazyLock<Regex>,
    /// Capture groups that may hold the path; the first one that participated wins.
    path_groups: &'static [usize],
}

static MARKDOWN_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\(([^)]+)\)").expect("static pattern"));
static HTML_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<img[^>]+src="([^">]+)""#).expect("static pattern"));
static HTML_VIDEO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<video[^>]+src="([^">]+)"|<source[^>]+src="([^">]+)""#).expect("static pattern")
});
static MARKDOWN_VIDEO_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[[^\]]*\]\(([^)]+\.(mp4|webm|ogg))\)").expect("static pattern")
});

static FAMILIES: [Family; 4] = [
    Family {
        kind: ReferenceKind::MarkdownImage,
        regex: &MARKDOWN_IMAGE,
        path_groups: &[1],
    },
    Family {
        kind: ReferenceKind::HtmlImage,
        regex: &HTML_IMAGE,
        path_groups: &[1],
    },
    Family {
        kind: ReferenceKind::HtmlVideo,
        regex: &HTML_VIDEO,
        path_groups: &[1, 2],
    },
    Family {
        kind: ReferenceKind::MarkdownVideoLink,
        regex: &MARKDOWN_VIDEO_LINK,
        path_groups: &[1],
    },
];

/// Scan `markdown` and return every media reference, family by family, each
/// family in first-match order.
///
/// Matches without a usable path are logged and skipped.
pub fn scan_references(markdown: &str) -> Vec<MediaReference> {
    let mut references = Vec::new();
    for family in &FAMILIES {
        for caps in family.regex.captures_iter(markdown) {
            match reference_from_captures(family, &caps) {
                Some(reference) => {
                    debug!(kind = %reference.kind, path = %reference.path, "Found media reference");
                    references.push(reference);
                }
                None => {
                    warn!(
                        kind = %family.kind,
                        tag = %&caps[0],
                        "Invalid media tag, no path captured; skipping"
                    );
                }
            }
        }
    }
    debug!(count = references.len(), "Scanned document for media references");
    references
}

fn reference_from_captures(family: &Family, caps: &Captures<'_>) -> Option<MediaReference> {
    let path = family
        .path_groups
        .iter()
        .filter_map(|&group| caps.get(group))
        .map(|m| m.as_str())
        .find(|p| !p.trim().is_empty())?;

    Some(MediaReference {
        original_tag: caps[0].to_string(),
        path: path.to_string(),
        kind: family.kind,
    })
}
