//! Conversion between the shadow [`Document`] and surface markup.

use crate::markup::{
    ADDED_ATTR, ADDED_TAG, BASELINE_ATTR, Element, MarkupError, MarkupNode, PARAGRAPH_TYPE,
    SENTENCE_TYPE, SPECIAL_ATTR, TYPE_ATTR, parse, write,
};
use crate::model::{Document, Paragraph, Run, Sentence};

pub fn write_document(document: &Document) -> String {
    let nodes: Vec<MarkupNode> = document
        .paragraphs()
        .iter()
        .map(|p| MarkupNode::Element(paragraph_element(p)))
        .collect();
    write(&nodes)
}

fn paragraph_element(paragraph: &Paragraph) -> Element {
    paragraph.sentences().iter().fold(
        Element::new("div")
            .with_attr(TYPE_ATTR, PARAGRAPH_TYPE)
            .with_attr("id", paragraph.id().to_string()),
        |element, sentence| element.with_child(MarkupNode::Element(sentence_element(sentence))),
    )
}

fn sentence_element(sentence: &Sentence) -> Element {
    let mut element = Element::new("span")
        .with_attr(TYPE_ATTR, SENTENCE_TYPE)
        .with_attr("id", sentence.id().to_string())
        .with_attr(BASELINE_ATTR, sentence.original_text())
        .with_attr(SPECIAL_ATTR, sentence.is_special().to_string());

    if sentence.is_blank() {
        return element.with_child(MarkupNode::Element(Element::new("br")));
    }

    for run in sentence.runs().iter().filter(|run| !run.text.is_empty()) {
        let text = MarkupNode::Text(run.text.clone());
        element = if run.added {
            element.with_child(MarkupNode::Element(
                Element::new(ADDED_TAG)
                    .with_attr(ADDED_ATTR, "true")
                    .with_child(text),
            ))
        } else {
            element.with_child(text)
        };
    }
    element
}

pub fn read_document(input: &str) -> Result<Document, MarkupError> {
    parse(input)?
        .iter()
        .map(|node| match node {
            MarkupNode::Element(e) if e.attr(TYPE_ATTR) == Some(PARAGRAPH_TYPE) => read_paragraph(e),
            MarkupNode::Element(e) => Err(MarkupError::Unexpected(format!("<{}>", e.tag))),
            MarkupNode::Text(_) => Err(MarkupError::Unexpected("text".to_string())),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Document::from_paragraphs)
}

fn read_paragraph(element: &Element) -> Result<Paragraph, MarkupError> {
    let id = required_attr(element, "id")?;
    let id = id
        .parse()
        .map_err(|_| MarkupError::InvalidId(id.to_string()))?;

    let sentences = element
        .children
        .iter()
        .map(|node| match node {
            MarkupNode::Element(e) if e.attr(TYPE_ATTR) == Some(SENTENCE_TYPE) => read_sentence(e),
            MarkupNode::Element(e) => Err(MarkupError::Unexpected(format!("<{}>", e.tag))),
            MarkupNode::Text(_) => Err(MarkupError::Unexpected("text".to_string())),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Paragraph::from_parts(id, sentences))
}

fn read_sentence(element: &Element) -> Result<Sentence, MarkupError> {
    let id = required_attr(element, "id")?;
    let id = id
        .parse()
        .map_err(|_| MarkupError::InvalidId(id.to_string()))?;
    let baseline = required_attr(element, BASELINE_ATTR)?.to_string();
    let special = element.attr(SPECIAL_ATTR) == Some("true");

    let mut runs: Vec<Run> = Vec::new();
    for child in &element.children {
        let run = match child {
            MarkupNode::Text(text) => Run::plain(text.clone()),
            MarkupNode::Element(e) if e.tag == "br" => continue,
            MarkupNode::Element(e) if e.attr(ADDED_ATTR) == Some("true") => {
                Run::added(e.text_content())
            }
            MarkupNode::Element(e) => Run::plain(e.text_content()),
        };
        match runs.last_mut() {
            Some(last) if last.added == run.added => last.text.push_str(&run.text),
            _ => runs.push(run),
        }
    }

    Ok(Sentence::from_parts(id, baseline, special, runs))
}

fn required_attr<'e>(element: &'e Element, attr: &'static str) -> Result<&'e str, MarkupError> {
    element.attr(attr).ok_or_else(|| MarkupError::MissingAttribute {
        tag: element.tag.clone(),
        attr,
    })
}
