/// Point one media tag at its uploaded copy.
///
/// The path is replaced inside the tag text only (first occurrence), and then
/// every occurrence of the original tag is swapped for the rewritten one. Other
/// occurrences of the bare path elsewhere in the document are left alone.
///
/// If the tag no longer occurs (an earlier reference already rewrote it) this
/// returns the text unchanged.
pub fn rewrite_reference(markdown: &str, original_tag: &str, path: &str, remote_uri: &str) -> String {
    let new_tag = original_tag.replacen(path, remote_uri, 1);
    markdown.replace(original_tag, &new_tag)
}
