//! Minimal XML tree for reading ADT responses.
//!
//! ADT payloads are small and attribute-heavy (`adtcore:name="..."`), so the
//! response is parsed once with quick-xml into an owned tree and queried by
//! local name. A name containing `:` matches the qualified name exactly.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, ErrorKind, Result};

/// An owned XML element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    /// Qualified element name, e.g. `adtcore:objectReference`.
    pub name: String,
    /// Attributes in document order, keyed by qualified name.
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order.
    pub children: Vec<XmlNode>,
    /// Concatenated, unescaped text content directly inside this element.
    pub text: String,
}

fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map(|(_, local)| local).unwrap_or(name)
}

fn name_matches(qualified: &str, wanted: &str) -> bool {
    if wanted.contains(':') {
        qualified == wanted
    } else {
        local_part(qualified) == wanted
    }
}

fn xml_error(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::Xml(message.into()))
}

fn open(start: &BytesStart<'_>) -> Result<XmlNode> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| xml_error(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attributes.push((key, value));
    }
    Ok(XmlNode {
        name,
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

impl XmlNode {
    /// Parse a document and return its root element.
    pub fn parse(xml: &str) -> Result<XmlNode> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(open(&start)?),
                Event::Empty(start) => {
                    let node = open(&start)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => root = Some(node),
                    }
                }
                Event::End(_) => {
                    let node = stack
                        .pop()
                        .ok_or_else(|| xml_error("unbalanced closing tag"))?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => root = Some(node),
                    }
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text.unescape()?);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        current
                            .text
                            .push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(xml_error("document ended inside an element"));
        }
        root.ok_or_else(|| xml_error("document has no root element"))
    }

    /// Element name without namespace prefix.
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Attribute value by local (or exact qualified) name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| name_matches(key, name))
            .map(|(_, value)| value.as_str())
    }

    /// Text content of this element.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// First direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| name_matches(&c.name, name))
    }

    /// All direct children with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children
            .iter()
            .filter(move |c| name_matches(&c.name, name))
    }

    /// Text of the first direct child with the given name.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str())
    }

    /// First element with the given name in depth-first order, including `self`.
    pub fn find(&self, name: &str) -> Option<&XmlNode> {
        if name_matches(&self.name, name) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }

    /// All elements with the given name in depth-first order, including `self`.
    pub fn find_all<'a>(&'a self, name: &str) -> Vec<&'a XmlNode> {
        let mut out = Vec::new();
        self.collect(name, &mut out);
        out
    }

    fn collect<'a>(&'a self, name: &str, out: &mut Vec<&'a XmlNode>) {
        if name_matches(&self.name, name) {
            out.push(self);
        }
        for child in &self.children {
            child.collect(name, out);
        }
    }

    /// Text of the first descendant with the given name.
    pub fn find_text(&self, name: &str) -> Option<&str> {
        self.find(name).map(|n| n.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCK_RESPONSE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<asx:abap xmlns:asx="http://www.sap.com/abapxml" version="1.0">
  <asx:values>
    <DATA>
      <LOCK_HANDLE>A1B2C3</LOCK_HANDLE>
      <CORRNR>DEVK900123</CORRNR>
      <IS_LOCAL/>
    </DATA>
  </asx:values>
</asx:abap>"#;

    #[test]
    fn test_parse_nested_text() {
        let root = XmlNode::parse(LOCK_RESPONSE).unwrap();
        assert_eq!(root.name, "asx:abap");
        assert_eq!(root.local_name(), "abap");
        assert_eq!(root.attr("version"), Some("1.0"));
        assert_eq!(root.find_text("LOCK_HANDLE"), Some("A1B2C3"));
        assert_eq!(root.find_text("CORRNR"), Some("DEVK900123"));
        assert_eq!(root.find_text("IS_LOCAL"), Some(""));
    }

    #[test]
    fn test_attributes_by_local_and_qualified_name() {
        let xml = r#"<adtcore:objectReferences xmlns:adtcore="http://www.sap.com/adt/core">
            <adtcore:objectReference adtcore:uri="/sap/bc/adt/oo/classes/zcl_a" adtcore:name="ZCL_A"/>
            <adtcore:objectReference adtcore:uri="/sap/bc/adt/oo/classes/zcl_b" adtcore:name="ZCL_B"/>
        </adtcore:objectReferences>"#;
        let root = XmlNode::parse(xml).unwrap();
        let refs = root.find_all("objectReference");
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].attr("name"), Some("ZCL_A"));
        assert_eq!(refs[1].attr("adtcore:uri"), Some("/sap/bc/adt/oo/classes/zcl_b"));
        assert!(refs[1].attr("other:uri").is_none());
    }

    #[test]
    fn test_unescapes_entities() {
        let root = XmlNode::parse(r#"<msg text="a &amp; b">x &lt; y</msg>"#).unwrap();
        assert_eq!(root.attr("text"), Some("a & b"));
        assert_eq!(root.text(), "x < y");
    }

    #[test]
    fn test_children_named() {
        let root =
            XmlNode::parse("<root><item>1</item><other/><item>2</item></root>").unwrap();
        let items: Vec<&str> = root.children_named("item").map(|n| n.text()).collect();
        assert_eq!(items, vec!["1", "2"]);
        assert_eq!(root.child_text("item"), Some("1"));
        assert!(root.child("missing").is_none());
    }

    #[test]
    fn test_empty_document_is_error() {
        assert!(XmlNode::parse("").is_err());
        assert!(XmlNode::parse("<?xml version=\"1.0\"?>").is_err());
    }

    #[test]
    fn test_truncated_document_is_error() {
        assert!(XmlNode::parse("<a><b></b>").is_err());
    }
}
