//! Schema-less view of a uVision project document.
//!
//! The two Keil toolchain families store their options under different
//! subtrees, so instead of a typed model the document is loaded into an
//! [`XmlValue`] tree:
//!
//! - an element holding only text becomes [`XmlValue::Text`],
//! - an element with child elements or attributes becomes [`XmlValue::Map`]
//!   (attributes are folded in as keys, mixed text lands under `"_"`),
//! - a tag repeated under the same parent becomes [`XmlValue::List`].
//!
//! A tag that appears once is therefore *not* wrapped in a list.  Consumers
//! that expect a list go through [`as_list`], which accepts either shape.

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::Serialize;

use crate::error::{Result, UvprojError};

/// Key under which mixed text content of an element is stored.
pub const TEXT_KEY: &str = "_";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum XmlValue {
    Text(String),
    Map(IndexMap<String, XmlValue>),
    List(Vec<XmlValue>),
}

impl XmlValue {
    /// Child value stored under `key`, if this is a map.
    pub fn get(&self, key: &str) -> Option<&XmlValue> {
        match self {
            XmlValue::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Walk a chain of keys.
    pub fn at(&self, path: &[&str]) -> Option<&XmlValue> {
        path.iter().try_fold(self, |node, key| node.get(key))
    }

    /// Like [`at`](Self::at), but a missing node is a
    /// [`UvprojError::MissingNode`] naming the dotted path.
    pub fn require(&self, path: &[&str]) -> Result<&XmlValue> {
        self.at(path).ok_or_else(|| UvprojError::missing(path.join(".")))
    }

    /// Text content: the string itself, or the `"_"` entry of a map.
    pub fn text(&self) -> Option<&str> {
        match self {
            XmlValue::Text(s) => Some(s),
            XmlValue::Map(map) => map.get(TEXT_KEY).and_then(XmlValue::text),
            XmlValue::List(_) => None,
        }
    }

    /// Text at `path`; missing nodes and non-text nodes are both errors.
    pub fn require_text(&self, path: &[&str]) -> Result<&str> {
        self.require(path)?
            .text()
            .ok_or_else(|| UvprojError::missing(path.join(".")))
    }

    /// Text at `path`, `None` when absent.
    pub fn text_at(&self, path: &[&str]) -> Option<&str> {
        self.at(path).and_then(XmlValue::text)
    }
}

/// Normalise the single-vs-many ambiguity of a field.
///
/// Absent → empty, a list → its items, anything else → a one-element list.
pub fn as_list(value: Option<&XmlValue>) -> Vec<&XmlValue> {
    match value {
        None => Vec::new(),
        Some(XmlValue::List(items)) => items.iter().collect(),
        Some(other) => vec![other],
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Loading – roxmltree → XmlValue
// ═══════════════════════════════════════════════════════════════════════════════

/// Parse XML text into a map holding the root element under its tag name,
/// e.g. `{"Project": {...}}`.
pub fn parse_document(source: &str) -> Result<XmlValue> {
    let doc = roxmltree::Document::parse(source)?;
    let root = doc.root_element();

    let mut top = IndexMap::new();
    top.insert(root.tag_name().name().to_string(), element_value(root));
    Ok(XmlValue::Map(top))
}

fn element_value(node: roxmltree::Node) -> XmlValue {
    let text: String = node
        .children()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();
    let text = text.trim();

    let has_children = node.children().any(|n| n.is_element());
    if !has_children && node.attributes().next().is_none() {
        return XmlValue::Text(text.to_string());
    }

    let mut map: IndexMap<String, XmlValue> = IndexMap::new();

    for attr in node.attributes() {
        map.insert(attr.name().to_string(), XmlValue::Text(attr.value().to_string()));
    }

    for child in node.children().filter(|n| n.is_element()) {
        let value = element_value(child);
        match map.entry(child.tag_name().name().to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(mut slot) => match slot.get_mut() {
                XmlValue::List(items) => items.push(value),
                existing => {
                    let first = std::mem::replace(existing, XmlValue::List(Vec::new()));
                    *existing = XmlValue::List(vec![first, value]);
                }
            },
        }
    }

    if !text.is_empty() {
        map.insert(TEXT_KEY.to_string(), XmlValue::Text(text.to_string()));
    }

    XmlValue::Map(map)
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no" ?>
<Project xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" noNamespaceSchemaLocation="project_projx.xsd">
  <SchemaVersion>2.1</SchemaVersion>
  <Targets>
    <Target>
      <TargetName>Debug</TargetName>
      <Groups>
        <Group>
          <GroupName>App</GroupName>
          <Files>
            <File><FileName>main.c</FileName><FilePath>.\main.c</FilePath></File>
            <File><FileName>util.c</FileName><FilePath>.\util.c</FilePath></File>
          </Files>
        </Group>
      </Groups>
    </Target>
  </Targets>
</Project>"#;

    #[test]
    fn root_is_keyed_by_tag() {
        let doc = parse_document(SAMPLE).unwrap();
        assert!(doc.get("Project").is_some());
        assert_eq!(doc.text_at(&["Project", "SchemaVersion"]), Some("2.1"));
    }

    #[test]
    fn attributes_fold_into_map() {
        let doc = parse_document(SAMPLE).unwrap();
        assert_eq!(
            doc.text_at(&["Project", "noNamespaceSchemaLocation"]),
            Some("project_projx.xsd")
        );
    }

    #[test]
    fn single_element_is_not_wrapped() {
        let doc = parse_document(SAMPLE).unwrap();
        let target = doc.at(&["Project", "Targets", "Target"]).unwrap();
        assert!(matches!(target, XmlValue::Map(_)));
        assert_eq!(target.text_at(&["TargetName"]), Some("Debug"));
    }

    #[test]
    fn repeated_elements_become_list() {
        let doc = parse_document(SAMPLE).unwrap();
        let files = doc
            .at(&["Project", "Targets", "Target", "Groups", "Group", "Files", "File"])
            .unwrap();
        match files {
            XmlValue::List(items) => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[1].text_at(&["FileName"]), Some("util.c"));
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn empty_element_is_empty_text() {
        let doc = parse_document("<A><B/><C></C></A>").unwrap();
        assert_eq!(doc.text_at(&["A", "B"]), Some(""));
        assert_eq!(doc.text_at(&["A", "C"]), Some(""));
    }

    #[test]
    fn mixed_text_goes_under_underscore() {
        let doc = parse_document(r#"<A><B id="1">hello</B></A>"#).unwrap();
        let b = doc.at(&["A", "B"]).unwrap();
        assert_eq!(b.text_at(&["id"]), Some("1"));
        assert_eq!(b.text(), Some("hello"));
    }

    #[test]
    fn malformed_text_is_rejected() {
        let err = parse_document("<Project><Targets></Project>").unwrap_err();
        assert!(matches!(err, UvprojError::MalformedDocument(_)), "got {err:?}");
    }

    #[test]
    fn require_reports_dotted_path() {
        let doc = parse_document(SAMPLE).unwrap();
        let err = doc.require(&["Project", "Nope", "Deeper"]).unwrap_err();
        match err {
            UvprojError::MissingNode { path } => assert_eq!(path, "Project.Nope.Deeper"),
            other => panic!("expected MissingNode, got {other:?}"),
        }
    }

    #[test]
    fn as_list_accepts_every_shape() {
        let one = XmlValue::Text("x".into());
        let many = XmlValue::List(vec![XmlValue::Text("a".into()), XmlValue::Text("b".into())]);

        assert!(as_list(None).is_empty());
        assert_eq!(as_list(Some(&one)), vec![&one]);
        assert_eq!(as_list(Some(&many)).len(), 2);
    }
}
