//! HTML-to-markdown conversion for scanner text fields.
//!
//! Scanner descriptions arrive as HTML fragments. This keeps the
//! conversion deliberately small: block tags become line breaks,
//! emphasis becomes markdown markers, everything else is stripped and
//! common entities are decoded.

use regex::Regex;

/// Convert an HTML fragment to markdown-ish plain text.
pub fn to_markdown(html: &str) -> String {
    let br = Regex::new(r"(?i)<br\s*/?>").unwrap();
    let block_close = Regex::new(r"(?i)</(p|div|tr|table|ul|ol|h[1-6])\s*>").unwrap();
    let list_item = Regex::new(r"(?i)<li[^>]*>").unwrap();
    let strong = Regex::new(r"(?i)</?(b|strong)\s*>").unwrap();
    let em = Regex::new(r"(?i)</?(i|em)\s*>").unwrap();
    let any_tag = Regex::new(r"(?s)<[^>]+>").unwrap();
    let excess_newlines = Regex::new(r"\n{3,}").unwrap();

    let text = br.replace_all(html, "\n");
    let text = block_close.replace_all(&text, "\n\n");
    let text = list_item.replace_all(&text, "\n* ");
    let text = strong.replace_all(&text, "**");
    let text = em.replace_all(&text, "*");
    let text = any_tag.replace_all(&text, "");
    let text = decode_entities(&text);
    let text = excess_newlines.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Decode the entities scanners actually emit. `&amp;` is decoded last
/// so double-encoded input is not over-decoded.
fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
