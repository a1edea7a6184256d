//! Main-text extraction: the concatenated text of every paragraph in a page.
//!
//! The algorithm is written against [`MarkupParser`], so it does not depend on a specific HTML
//! library. `wordcloud-local` plugs in an html5ever-backed tree builder.

use crate::textprep::norm_ws;

/// Elements whose whole subtree is dropped before harvesting text.
pub const EXCLUDED_TAGS: [&str; 3] = ["script", "style", "noscript"];

/// Paragraph element name.
pub const PARAGRAPH_TAG: &str = "p";

/// One step of a document-order walk over a parsed tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupEvent<'a> {
    Open(&'a str),
    Close(&'a str),
    Text(&'a str),
}

/// A parsed document that can be walked in document order.
///
/// Every `Open` must be matched by a `Close` for the same element, properly nested.
pub trait MarkupTree {
    fn walk(&self, visit: &mut dyn FnMut(MarkupEvent<'_>));
}

/// A permissive tree-building parser. Parsing never fails: malformed input yields some tree.
pub trait MarkupParser {
    type Tree: MarkupTree;
    fn parse(&self, html: &str) -> Self::Tree;
}

fn is_excluded(tag: &str) -> bool {
    EXCLUDED_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

fn is_paragraph(tag: &str) -> bool {
    tag.eq_ignore_ascii_case(PARAGRAPH_TAG)
}

/// Extract the main text of `html` using `parser`.
///
/// Text of every `<p>` (in pre-order, so a nested paragraph yields its own entry and also feeds
/// its ancestor) is joined with single spaces and whitespace-normalized. Anything under
/// `<script>`, `<style>` or `<noscript>` is ignored, including paragraphs inside them.
pub fn extract_main_text_with<P>(parser: &P, html: &str) -> String
where
    P: MarkupParser + ?Sized,
{
    if html.is_empty() {
        return String::new();
    }
    let tree = parser.parse(html);

    // Output slot per paragraph, reserved when the paragraph opens so the order is pre-order.
    let mut slots: Vec<String> = Vec::new();
    // Slot indices of the currently open paragraphs, innermost last.
    let mut open: Vec<usize> = Vec::new();
    let mut excluded_depth = 0usize;

    tree.walk(&mut |ev| match ev {
        MarkupEvent::Open(tag) => {
            if is_excluded(tag) {
                excluded_depth += 1;
            } else if excluded_depth == 0 && is_paragraph(tag) {
                open.push(slots.len());
                slots.push(String::new());
            }
        }
        MarkupEvent::Close(tag) => {
            if is_excluded(tag) {
                excluded_depth = excluded_depth.saturating_sub(1);
            } else if excluded_depth == 0 && is_paragraph(tag) {
                open.pop();
            }
        }
        MarkupEvent::Text(t) => {
            if excluded_depth > 0 || open.is_empty() {
                return;
            }
            let t = t.trim();
            if t.is_empty() {
                return;
            }
            for &i in &open {
                let slot = &mut slots[i];
                if !slot.is_empty() {
                    slot.push(' ');
                }
                slot.push_str(t);
            }
        }
    });

    norm_ws(&slots.join(" "))
}
