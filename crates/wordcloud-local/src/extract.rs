use html_scraper::{Html, Node};
use wordcloud_core::{extract_main_text_with, MarkupEvent, MarkupParser, MarkupTree};

/// html5ever tree builder (through `scraper`). Never fails: malformed markup is repaired the way
/// browsers repair it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScraperParser;

pub struct ScrapedDocument(Html);

impl MarkupParser for ScraperParser {
    type Tree = ScrapedDocument;

    fn parse(&self, html: &str) -> ScrapedDocument {
        ScrapedDocument(Html::parse_document(html))
    }
}

impl MarkupTree for ScrapedDocument {
    fn walk(&self, visit: &mut dyn FnMut(MarkupEvent<'_>)) {
        // Explicit stack: deeply nested documents must not recurse. The flag marks a node whose
        // children are done and whose Close is due.
        let mut stack = vec![(self.0.tree.root(), false)];
        while let Some((node, closing)) = stack.pop() {
            if closing {
                if let Node::Element(el) = node.value() {
                    visit(MarkupEvent::Close(el.name()));
                }
                continue;
            }
            match node.value() {
                Node::Element(el) => visit(MarkupEvent::Open(el.name())),
                Node::Text(t) => visit(MarkupEvent::Text(t)),
                _ => {}
            }
            stack.push((node, true));
            let mut child = node.last_child();
            while let Some(c) = child {
                stack.push((c, false));
                child = c.prev_sibling();
            }
        }
    }
}

/// Paragraph text of `html`, whitespace-normalized. See
/// [`wordcloud_core::extract_main_text_with`].
pub fn extract_main_text(html: &str) -> String {
    extract_main_text_with(&ScraperParser, html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn script_inside_paragraph_is_removed() {
        let html = "<p>Hello <script>evil()</script> world</p>";
        assert_eq!(extract_main_text(html), "Hello world");
    }

    #[test]
    fn only_paragraphs_are_harvested() {
        let html = r#"<html><head><title>T</title><style>p{color:red}</style></head>
            <body><nav>Home | About</nav><h1>Heading</h1>
            <p>First   paragraph,
            spanning lines.</p>
            <div>ignored div</div>
            <p>Second <a href="/x">linked</a> paragraph.</p>
            <noscript><p>Please enable JavaScript</p></noscript>
            </body></html>"#;
        assert_eq!(
            extract_main_text(html),
            "First paragraph, spanning lines. Second linked paragraph."
        );
    }

    #[test]
    fn no_paragraphs_and_empty_input_yield_empty() {
        assert_eq!(extract_main_text(""), "");
        assert_eq!(extract_main_text("<div>no paragraphs here</div>"), "");
        assert_eq!(extract_main_text("<p>   </p>"), "");
    }

    #[test]
    fn malformed_markup_is_tolerated() {
        let html = "<P>unclosed one<p>two <b>bold</p><div><p>three";
        assert_eq!(extract_main_text(html), "unclosed one two bold three");
    }

    #[test]
    fn entities_are_decoded() {
        assert_eq!(extract_main_text("<p>fish &amp; chips&nbsp;today</p>"), "fish & chips today");
    }

    #[test]
    fn comments_are_not_text() {
        assert_eq!(extract_main_text("<p>a<!-- hidden -->b</p>"), "a b");
    }

    #[test]
    fn deep_nesting_does_not_overflow() {
        let depth = 2_000;
        let html = format!("{}<p>deep</p>{}", "<div>".repeat(depth), "</div>".repeat(depth));
        assert_eq!(extract_main_text(&html), "deep");
    }

    proptest! {
        #[test]
        fn extraction_is_deterministic_and_never_panics(s in ".{0,300}") {
            let a = extract_main_text(&s);
            let b = extract_main_text(&s);
            prop_assert_eq!(&a, &b);
            prop_assert_eq!(a.trim(), a.as_str());
            prop_assert!(!a.contains("  "));
        }

        #[test]
        fn normalized_text_in_one_paragraph_round_trips(words in proptest::collection::vec("[a-zA-Z]{1,10}", 1..20)) {
            let text = words.join(" ");
            prop_assert_eq!(extract_main_text(&format!("<p>{text}</p>")), text);
        }
    }
}
