//! In-memory element tree handed to the parsers.
//!
//! Names keep their namespace prefix (`uml:Model`, `xmi:id`) so the parsers
//! can match on the spelling every exporter uses, whatever URI the prefix is
//! bound to.

use roxmltree::{Document as XmlDocument, Node};

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: Option<String>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Parse XMI text into an element tree rooted at the document element.
    pub fn parse_xml(input: &str) -> Result<Self, DocumentError> {
        let doc = XmlDocument::parse(input)?;
        Ok(convert(doc.root_element()))
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute value with surrounding whitespace removed; blank counts as absent.
    pub fn non_empty_attr(&self, key: &str) -> Option<&str> {
        self.attr(key).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn id(&self) -> Option<&str> {
        self.non_empty_attr("xmi:id")
    }

    pub fn xmi_type(&self) -> Option<&str> {
        self.non_empty_attr("xmi:type")
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }
}

fn convert(node: Node) -> Element {
    let tag = node.tag_name();
    let mut element = Element::new(qualified_name(node, tag.namespace(), tag.name()));

    for attr in node.attributes() {
        element.attributes.push((
            qualified_name(node, attr.namespace(), attr.name()),
            attr.value().to_string(),
        ));
    }

    let mut text = String::new();
    for child in node.children() {
        if child.is_element() {
            element.children.push(convert(child));
        } else if child.is_text() {
            text.push_str(child.text().unwrap_or_default());
        }
    }
    let text = text.trim();
    if !text.is_empty() {
        element.text = Some(text.to_string());
    }

    element
}

fn qualified_name(node: Node, namespace: Option<&str>, local: &str) -> String {
    match namespace.and_then(|ns| node.lookup_prefix(ns)) {
        Some(prefix) => format!("{}:{}", prefix, local),
        None => local.to_string(),
    }
}
