//! # XML Element Tree
//!
//! The owned element tree all primary-format reading and writing flows
//! through. The batch engine's two-phase decode depends on holding nested
//! record fragments as *untyped* subtrees until the envelope discriminator
//! is known; this module is that intermediate representation.
//!
//! ## Design
//!
//! - Attributes are ordered name/value string pairs. Prefixed names
//!   (`xsi:schemaLocation`) are carried verbatim — the engine matches on
//!   the local part where it needs to, it never resolves namespaces.
//! - Text and attribute values are unescaped on read and escaped on
//!   write by quick-xml; nothing else touches the event stream.
//! - Mixed content is not modeled: an element has children and at most
//!   one text run, which is all the batch schemas produce.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;

/// Error reading or writing the primary wire format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XmlError {
    /// The input is not well-formed XML.
    #[error("malformed document: {0}")]
    Syntax(String),

    /// A name, attribute, or text run is not valid UTF-8.
    #[error("document contains invalid UTF-8")]
    Utf8,

    /// The input contains no root element.
    #[error("document contains no root element")]
    EmptyDocument,

    /// Content follows the root element.
    #[error("content after the document root")]
    TrailingContent,

    /// An attribute value does not parse as the expected type.
    #[error("attribute {name} has invalid value {value:?}")]
    InvalidAttrValue {
        /// Attribute name.
        name: String,
        /// The unparseable value.
        value: String,
    },

    /// Serialization failed.
    #[error("write error: {0}")]
    Write(String),
}

/// One element of an XML document tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Element name as it appears on the wire, prefix included.
    pub name: String,
    /// Attributes in document order, names verbatim.
    pub attrs: Vec<(String, String)>,
    /// Child elements in document order.
    pub children: Vec<XmlElement>,
    /// Text content, if any.
    pub text: Option<String>,
}

impl XmlElement {
    /// An empty element with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder: add an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Builder: set text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder: append a child element.
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Append an attribute.
    pub fn push_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.push((name.into(), value.into()));
    }

    /// Append a child element.
    pub fn push_child(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    /// First attribute with the given name, verbatim match.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute parsed as `u64`; `Ok(None)` when absent.
    pub fn attr_u64(&self, name: &str) -> Result<Option<u64>, XmlError> {
        self.parse_attr(name, str::parse::<u64>)
    }

    /// Attribute parsed as `i64`; `Ok(None)` when absent.
    pub fn attr_i64(&self, name: &str) -> Result<Option<i64>, XmlError> {
        self.parse_attr(name, str::parse::<i64>)
    }

    /// Attribute parsed as `f64`; `Ok(None)` when absent.
    pub fn attr_f64(&self, name: &str) -> Result<Option<f64>, XmlError> {
        self.parse_attr(name, str::parse::<f64>)
    }

    fn parse_attr<T, E>(
        &self,
        name: &str,
        parse: impl Fn(&str) -> Result<T, E>,
    ) -> Result<Option<T>, XmlError> {
        match self.attr(name) {
            None => Ok(None),
            Some(raw) => parse(raw).map(Some).map_err(|_| XmlError::InvalidAttrValue {
                name: name.to_string(),
                value: raw.to_string(),
            }),
        }
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All child elements with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Text content of the first child with the given name.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(|c| c.text.as_deref())
    }

    /// Parse a complete document into its root element.
    pub fn parse_document(input: &str) -> Result<XmlElement, XmlError> {
        let mut reader = Reader::from_str(input);
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| XmlError::Syntax(e.to_string()))?;
            match event {
                Event::Start(start) => {
                    if root.is_some() && stack.is_empty() {
                        return Err(XmlError::TrailingContent);
                    }
                    stack.push(element_from_start(&start)?);
                }
                Event::Empty(start) => {
                    if root.is_some() && stack.is_empty() {
                        return Err(XmlError::TrailingContent);
                    }
                    let element = element_from_start(&start)?;
                    attach(&mut stack, &mut root, element);
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| XmlError::Syntax("unexpected closing tag".to_string()))?;
                    attach(&mut stack, &mut root, element);
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| XmlError::Syntax(e.to_string()))?;
                    push_text(&mut stack, &text)?;
                }
                Event::CData(cdata) => {
                    let bytes = cdata.into_inner();
                    let text = std::str::from_utf8(&bytes).map_err(|_| XmlError::Utf8)?;
                    push_text(&mut stack, text)?;
                }
                Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
                Event::Eof => break,
            }
        }

        if !stack.is_empty() {
            return Err(XmlError::Syntax("unclosed element".to_string()));
        }
        root.ok_or(XmlError::EmptyDocument)
    }

    /// Render as a complete document with an XML declaration.
    pub fn to_document_string(&self) -> Result<String, XmlError> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(write_err)?;
        write_element(&mut writer, self)?;
        String::from_utf8(writer.into_inner()).map_err(|_| XmlError::Utf8)
    }

    /// Render as a bare fragment, no declaration.
    pub fn to_fragment_string(&self) -> Result<String, XmlError> {
        let mut writer = Writer::new(Vec::new());
        write_element(&mut writer, self)?;
        String::from_utf8(writer.into_inner()).map_err(|_| XmlError::Utf8)
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement, XmlError> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|_| XmlError::Utf8)?
        .to_string();
    let mut element = XmlElement::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| XmlError::Syntax(e.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|_| XmlError::Utf8)?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| XmlError::Syntax(e.to_string()))?
            .into_owned();
        element.attrs.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut Vec<XmlElement>, root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn push_text(stack: &mut [XmlElement], text: &str) -> Result<(), XmlError> {
    if text.trim().is_empty() {
        return Ok(());
    }
    match stack.last_mut() {
        Some(top) => {
            match &mut top.text {
                Some(existing) => existing.push_str(text),
                None => top.text = Some(text.to_string()),
            }
            Ok(())
        }
        None => Err(XmlError::TrailingContent),
    }
}

fn write_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    element: &XmlElement,
) -> Result<(), XmlError> {
    let mut start = BytesStart::new(element.name.as_str());
    for (name, value) in &element.attrs {
        start.push_attribute((name.as_str(), value.as_str()));
    }

    if element.children.is_empty() && element.text.is_none() {
        return writer.write_event(Event::Empty(start)).map_err(write_err);
    }

    writer.write_event(Event::Start(start)).map_err(write_err)?;
    if let Some(text) = &element.text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(write_err)?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(write_err)
}

fn write_err<E: std::fmt::Display>(err: E) -> XmlError {
    XmlError::Write(err.to_string())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn xml_name() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9]{0,8}"
    }

    fn attr_value() -> impl Strategy<Value = String> {
        // Printable ASCII, including characters the writer must escape.
        "[ -~]{0,12}"
    }

    fn text_content() -> impl Strategy<Value = String> {
        // Whitespace-only runs are not modeled as text.
        "[ -~]{1,20}".prop_filter("not all whitespace", |s| !s.trim().is_empty())
    }

    fn element() -> impl Strategy<Value = XmlElement> {
        let node = |children: Vec<XmlElement>| {
            (
                xml_name(),
                prop::collection::btree_map("[a-z]{1,6}", attr_value(), 0..3),
                prop::option::of(text_content()),
            )
                .prop_map(move |(name, attrs, text)| XmlElement {
                    name,
                    attrs: attrs.into_iter().collect(),
                    children: children.clone(),
                    text,
                })
        };
        let leaf = node(Vec::new());
        leaf.prop_recursive(3, 16, 4, move |inner| {
            (
                xml_name(),
                prop::collection::btree_map("[a-z]{1,6}", attr_value(), 0..3),
                prop::option::of(text_content()),
                prop::collection::vec(inner, 0..4),
            )
                .prop_map(|(name, attrs, text, children)| XmlElement {
                    name,
                    attrs: attrs.into_iter().collect(),
                    children,
                    text,
                })
        })
    }

    proptest! {
        /// Render → parse is the identity on element trees, escaping
        /// included.
        #[test]
        fn document_round_trip(el in element()) {
            let rendered = el.to_document_string().unwrap();
            let parsed = XmlElement::parse_document(&rendered).unwrap();
            prop_assert_eq!(parsed, el);
        }

        /// Rendering is deterministic.
        #[test]
        fn rendering_is_deterministic(el in element()) {
            prop_assert_eq!(
                el.to_document_string().unwrap(),
                el.to_document_string().unwrap()
            );
        }
    }
}
