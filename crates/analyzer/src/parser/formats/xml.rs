use roxmltree::{Document, Node, ParsingOptions};
use serde_json::{Map, Value};
use tracing::debug;

use crate::parser::traits::*;

/// XML document parser: each element child of the root is one record with
/// `tag`, `attributes` and `text`, plus one field per grandchild element.
///
/// Namespaced tags are written `{namespace}local`. DTDs are accepted; entity
/// expansion stays within roxmltree's limits.
#[derive(Debug, Default)]
pub struct XmlDocumentParser;

impl XmlDocumentParser {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentParser for XmlDocumentParser {
    fn parse_document(&self, content: &str) -> Vec<LogRecord> {
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = match Document::parse_with_options(content, options) {
            Ok(doc) => doc,
            Err(e) => {
                debug!(error = %e, "Unparseable XML document");
                return vec![LogRecord::failed(content, LogFormat::XmlError)];
            }
        };

        doc.root_element()
            .children()
            .filter(Node::is_element)
            .map(|element| element_to_record(content, element))
            .collect()
    }

    fn format(&self) -> LogFormat {
        LogFormat::Xml
    }
}

fn element_to_record(content: &str, element: Node<'_, '_>) -> LogRecord {
    let raw = content.get(element.range()).unwrap_or_default();
    let mut record = LogRecord::new(raw, LogFormat::Xml);

    let attributes: Map<String, Value> = element
        .attributes()
        .map(|attr| (attr.name().to_string(), Value::String(attr.value().to_string())))
        .collect();

    record.push_extra("tag", Value::String(qualified_name(element)));
    record.push_extra("attributes", Value::Object(attributes));
    record.push_extra("text", Value::String(element.text().unwrap_or_default().to_string()));

    for child in element.children().filter(Node::is_element) {
        let value = child
            .text()
            .map(|text| Value::String(text.to_string()))
            .unwrap_or(Value::Null);
        record.set_field(&qualified_name(child), value);
    }
    record
}

fn qualified_name(node: Node<'_, '_>) -> String {
    let tag = node.tag_name();
    match tag.namespace() {
        Some(ns) => format!("{{{}}}{}", ns, tag.name()),
        None => tag.name().to_string(),
    }
}
