//! # Surface Markup
//!
//! The serialized form of the surface: a small HTML subset that the shadow
//! document renders to, the surface host parses, and history entries store.
//!
//! ```text
//! <div data-type="paragraph" id="…">
//!   <span data-type="sentence" id="…" data-text="…" data-special="false">
//!     plain text <mark data-added="true">inserted text</mark>
//!   </span>
//! </div>
//! ```
//!
//! (shown indented; the writer emits no whitespace between tags)
//!
//! Text and attribute values are escaped with [`html_escape`]. The writer's
//! output is well-formed XML, so the reader hands it to [`roxmltree`] inside a
//! wrapper element and maps the resulting tree onto [`MarkupNode`]s.

mod document;

pub use document::{read_document, write_document};

use html_escape::{encode_double_quoted_attribute, encode_text};

pub const TYPE_ATTR: &str = "data-type";
pub const PARAGRAPH_TYPE: &str = "paragraph";
pub const SENTENCE_TYPE: &str = "sentence";
pub const BASELINE_ATTR: &str = "data-text";
pub const SPECIAL_ATTR: &str = "data-special";
pub const ADDED_ATTR: &str = "data-added";
pub const ADDED_TAG: &str = "mark";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkupError {
    #[error("Malformed markup: {0}")]
    Malformed(String),
    #[error("<{tag}> is missing the {attr} attribute")]
    MissingAttribute { tag: String, attr: &'static str },
    #[error("Invalid id {0:?}")]
    InvalidId(String),
    #[error("Unexpected {0} in document markup")]
    Unexpected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<MarkupNode>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: MarkupNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Concatenated text of all descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

fn collect_text(nodes: &[MarkupNode], out: &mut String) {
    for node in nodes {
        match node {
            MarkupNode::Text(text) => out.push_str(text),
            MarkupNode::Element(element) => collect_text(&element.children, out),
        }
    }
}

/// Elements written as `<tag/>` and never given children
fn is_void(tag: &str) -> bool {
    tag == "br"
}

/// Write nodes as markup
pub fn write(nodes: &[MarkupNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(&mut out, node);
    }
    out
}

fn write_node(out: &mut String, node: &MarkupNode) {
    match node {
        MarkupNode::Text(text) => push_escaped(out, &encode_text(text)),
        MarkupNode::Element(element) => {
            out.push('<');
            out.push_str(&element.tag);
            for (name, value) in &element.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                push_escaped(out, &encode_double_quoted_attribute(value));
                out.push('"');
            }
            if is_void(&element.tag) {
                out.push_str("/>");
                return;
            }
            out.push('>');
            for child in &element.children {
                write_node(out, child);
            }
            out.push_str("</");
            out.push_str(&element.tag);
            out.push('>');
        }
    }
}

/// Push already entity-encoded text, writing the whitespace that XML readers
/// normalize as character references
fn push_escaped(out: &mut String, encoded: &str) {
    for ch in encoded.chars() {
        match ch {
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            ch => out.push(ch),
        }
    }
}

const WRAPPER: &str = "redline-root";

/// Parse markup into a node list
pub fn parse(input: &str) -> Result<Vec<MarkupNode>, MarkupError> {
    let wrapped = format!("<{WRAPPER}>{input}</{WRAPPER}>");
    let document =
        roxmltree::Document::parse(&wrapped).map_err(|err| MarkupError::Malformed(err.to_string()))?;
    Ok(convert_children(document.root_element()))
}

fn convert_children(node: roxmltree::Node<'_, '_>) -> Vec<MarkupNode> {
    node.children().filter_map(convert_node).collect()
}

fn convert_node(node: roxmltree::Node<'_, '_>) -> Option<MarkupNode> {
    if node.is_element() {
        let element = Element {
            tag: node.tag_name().name().to_string(),
            attrs: node
                .attributes()
                .map(|attr| (attr.name().to_string(), attr.value().to_string()))
                .collect(),
            children: convert_children(node),
        };
        Some(MarkupNode::Element(element))
    } else if node.is_text() {
        node.text().map(|text| MarkupNode::Text(text.to_string()))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn text(value: &str) -> MarkupNode {
        MarkupNode::Text(value.to_string())
    }

    #[test]
    fn write_escapes_text_and_attributes() {
        let node = MarkupNode::Element(
            Element::new("span")
                .with_attr("data-text", "say \"hi\" & <go>")
                .with_child(text("a < b & c")),
        );

        insta::assert_snapshot!(
            write(&[node]),
            @r#"<span data-text="say &quot;hi&quot; &amp; &lt;go&gt;">a &lt; b &amp; c</span>"#
        );
    }

    #[test]
    fn void_elements_self_close() {
        let node = MarkupNode::Element(Element::new("span").with_child(MarkupNode::Element(Element::new("br"))));
        assert_eq!(write(&[node]), "<span><br/></span>");
    }

    #[test]
    fn parse_reads_back_written_markup() {
        let nodes = vec![MarkupNode::Element(
            Element::new("div")
                .with_attr("id", "p1")
                .with_child(MarkupNode::Element(
                    Element::new("span")
                        .with_attr("data-text", "x & \"y\"")
                        .with_child(text("plain "))
                        .with_child(MarkupNode::Element(
                            Element::new("mark")
                                .with_attr("data-added", "true")
                                .with_child(text("new <b>")),
                        )),
                ))
                .with_child(MarkupNode::Element(
                    Element::new("span").with_child(MarkupNode::Element(Element::new("br"))),
                )),
        )];

        assert_eq!(parse(&write(&nodes)).unwrap(), nodes);
    }

    #[test]
    fn parse_accepts_spaced_self_closing_tag() {
        assert_eq!(
            parse("<br />").unwrap(),
            vec![MarkupNode::Element(Element::new("br"))]
        );
    }

    #[test]
    fn parse_empty_input() {
        assert_eq!(parse("").unwrap(), vec![]);
    }

    #[rstest]
    #[case::unclosed("<div><span>text</span>")]
    #[case::mismatched("<div></span>")]
    #[case::stray_close("text</div>")]
    #[case::unquoted_attribute("<div id=x>")]
    fn parse_rejects_malformed_markup(#[case] input: &str) {
        assert!(matches!(parse(input), Err(MarkupError::Malformed(_))));
    }

    #[test]
    fn whitespace_survives_in_attributes_and_text() {
        let nodes = vec![MarkupNode::Element(
            Element::new("span")
                .with_attr("data-text", "tab\there\nnext\r")
                .with_child(text("line\r\nbreak  ")),
        )];

        let written = write(&nodes);

        assert!(written.contains("tab&#9;here&#10;next&#13;"));
        assert_eq!(parse(&written).unwrap(), nodes);
    }

    #[test]
    fn parse_decodes_character_references() {
        assert_eq!(
            parse("a &amp; b &#233;").unwrap(),
            vec![text("a & b é")]
        );
    }

    #[test]
    fn parse_skips_comments() {
        assert_eq!(
            parse("<!-- note --><br/>").unwrap(),
            vec![MarkupNode::Element(Element::new("br"))]
        );
    }

    #[test]
    fn text_content_skips_tags() {
        let element = Element::new("span")
            .with_child(text("Hello "))
            .with_child(MarkupNode::Element(Element::new("mark").with_child(text("big "))))
            .with_child(MarkupNode::Element(Element::new("br")))
            .with_child(text("world"));
        assert_eq!(element.text_content(), "Hello big world");
    }
}
