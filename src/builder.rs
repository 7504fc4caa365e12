//! Projects a reflective message into a [`Document`].
//!
//! The walk is depth-first over populated fields in declaration order:
//!
//! - scalars and enums become `<field>text</field>`, zero values are skipped
//! - repeated scalars become `<field><element>text</element>...</field>`
//! - repeated messages become one `<field>` sibling per item, with no container
//! - nested messages become `<field>` with the message's fields inside
//! - maps become `<field><key>...</key>...</field>` with entries sorted by key,
//!   a map with an empty string key is rejected

use crate::error::{ProtoQueryError, Result};
use crate::format::format_scalar;
use crate::node::{Document, NodeId};
use crate::reflect::{Field, FieldValue, MapValue, ReflectMessage, Scalar};
use log::debug;
use std::cmp::Ordering;

/// The element name used for the items of a repeated scalar field.
pub const REPEATED_ITEM_NAME: &str = "element";

/// Builds the document tree for `message`.
pub fn parse(message: &dyn ReflectMessage) -> Result<Document> {
    let mut doc = Document::new(message.full_name());
    let root = doc.root_id();
    build_message(&mut doc, root, message)?;
    debug!("Built document for '{}' with {} nodes", doc.name(), doc.node_count());
    Ok(doc)
}

fn build_message(doc: &mut Document, parent: NodeId, message: &dyn ReflectMessage) -> Result<()> {
    for field in message.fields() {
        build_field(doc, parent, field)?;
    }
    Ok(())
}

fn build_field(doc: &mut Document, parent: NodeId, field: Field<'_>) -> Result<()> {
    let Field { name, value } = field;
    match value {
        FieldValue::Scalar(scalar) => {
            if !scalar.is_default() {
                doc.append_leaf(parent, &name, format_scalar(&scalar));
            }
        }
        FieldValue::Message(message) => {
            let element = doc.append_element(parent, &name);
            build_message(doc, element, message)?;
        }
        FieldValue::RepeatedScalar(items) => {
            if !items.is_empty() {
                let container = doc.append_element(parent, &name);
                for item in &items {
                    doc.append_leaf(container, REPEATED_ITEM_NAME, format_scalar(item));
                }
            }
        }
        FieldValue::RepeatedMessage(items) => {
            for item in items {
                let element = doc.append_element(parent, &name);
                build_message(doc, element, item)?;
            }
        }
        FieldValue::Map(mut entries) => {
            if !entries.is_empty() {
                entries.sort_by(|(a, _), (b, _)| compare_keys(a, b));
                let container = doc.append_element(parent, &name);
                for (key, value) in entries {
                    let key = format_scalar(&key);
                    // An empty key has no element name to become.
                    if key.is_empty() {
                        return Err(ProtoQueryError::UnsupportedFieldKind {
                            field: name.into_owned(),
                            kind: "map entry with an empty key".to_string(),
                        });
                    }
                    match value {
                        MapValue::Scalar(scalar) => {
                            doc.append_leaf(container, &key, format_scalar(&scalar));
                        }
                        MapValue::Message(message) => {
                            let element = doc.append_element(container, &key);
                            build_message(doc, element, message)?;
                        }
                    }
                }
            }
        }
        FieldValue::Unsupported(kind) => {
            return Err(ProtoQueryError::UnsupportedFieldKind {
                field: name.into_owned(),
                kind,
            });
        }
    }
    Ok(())
}

fn compare_keys(a: &Scalar<'_>, b: &Scalar<'_>) -> Ordering {
    match (a, b) {
        (Scalar::Bool(a), Scalar::Bool(b)) => a.cmp(b),
        (Scalar::I32(a), Scalar::I32(b)) => a.cmp(b),
        (Scalar::I64(a), Scalar::I64(b)) => a.cmp(b),
        (Scalar::U32(a), Scalar::U32(b)) => a.cmp(b),
        (Scalar::U64(a), Scalar::U64(b)) => a.cmp(b),
        (Scalar::String(a), Scalar::String(b)) => a.cmp(b),
        _ => format_scalar(a).cmp(&format_scalar(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeType;
    use std::borrow::Cow;

    enum TestValue {
        Scalar(Scalar<'static>),
        Message(TestMessage),
        RepeatedScalar(Vec<Scalar<'static>>),
        RepeatedMessage(Vec<TestMessage>),
        Map(Vec<(Scalar<'static>, TestMessage)>),
        Unsupported(&'static str),
    }

    struct TestMessage {
        fields: Vec<(&'static str, TestValue)>,
    }

    impl TestMessage {
        fn new(fields: Vec<(&'static str, TestValue)>) -> Self {
            Self { fields }
        }
    }

    impl ReflectMessage for TestMessage {
        fn full_name(&self) -> Cow<'_, str> {
            Cow::Borrowed("test.Message")
        }

        fn fields(&self) -> Box<dyn Iterator<Item = Field<'_>> + '_> {
            Box::new(self.fields.iter().map(|(name, value)| {
                let value = match value {
                    TestValue::Scalar(s) => FieldValue::Scalar(s.clone()),
                    TestValue::Message(m) => FieldValue::Message(m),
                    TestValue::RepeatedScalar(items) => FieldValue::RepeatedScalar(items.clone()),
                    TestValue::RepeatedMessage(items) => {
                        FieldValue::RepeatedMessage(items.iter().map(|m| m as &dyn ReflectMessage).collect())
                    }
                    TestValue::Map(entries) => FieldValue::Map(
                        entries
                            .iter()
                            .map(|(k, m)| (k.clone(), MapValue::Message(m as &dyn ReflectMessage)))
                            .collect(),
                    ),
                    TestValue::Unsupported(kind) => FieldValue::Unsupported(kind.to_string()),
                };
                Field::new(*name, value)
            }))
        }
    }

    fn scalar(value: impl Into<Scalar<'static>>) -> TestValue {
        TestValue::Scalar(value.into())
    }

    fn names(doc: &Document) -> Vec<&str> {
        doc.root().descendants().map(|n| n.name()).collect()
    }

    #[test]
    fn test_scalars_become_leaf_elements() {
        let message = TestMessage::new(vec![("name", scalar("Jack")), ("id", scalar(201i32))]);
        let doc = parse(&message).unwrap();
        let children = doc.child_nodes();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].name(), "name");
        assert_eq!(children[0].value(), Some("Jack"));
        assert_eq!(children[1].value(), Some("201"));
        assert_eq!(doc.name(), "test.Message");
    }

    #[test]
    fn test_default_scalars_are_omitted() {
        let message = TestMessage::new(vec![
            ("age", scalar(0i32)),
            ("email", scalar("")),
            ("active", scalar(false)),
            ("type", TestValue::Scalar(Scalar::Enum(0))),
            ("id", scalar(7u64)),
        ]);
        let doc = parse(&message).unwrap();
        assert_eq!(names(&doc), vec!["id", ""]);
    }

    #[test]
    fn test_repeated_scalars_get_a_container() {
        let message = TestMessage::new(vec![
            ("tags", TestValue::RepeatedScalar(vec!["a".into(), "b".into(), "c".into()])),
            ("empty", TestValue::RepeatedScalar(vec![])),
        ]);
        let doc = parse(&message).unwrap();
        let children = doc.child_nodes();
        assert_eq!(children.len(), 1);
        let items: Vec<_> = children[0].children().collect();
        assert_eq!(items.len(), 3);
        for (item, expected) in items.iter().zip(["a", "b", "c"]) {
            assert_eq!(item.name(), REPEATED_ITEM_NAME);
            assert_eq!(item.children().count(), 1);
            assert_eq!(item.value(), Some(expected));
        }
    }

    #[test]
    fn test_repeated_messages_are_flat_siblings() {
        let phone = |number: &'static str| TestMessage::new(vec![("number", scalar(number))]);
        let message = TestMessage::new(vec![(
            "phones",
            TestValue::RepeatedMessage(vec![phone("1"), phone("2")]),
        )]);
        let doc = parse(&message).unwrap();
        let children = doc.child_nodes();
        assert_eq!(children.len(), 2);
        assert!(children.iter().all(|c| c.name() == "phones"));
        assert_eq!(children[1].select_element("number").and_then(|n| n.value()), Some("2"));
    }

    #[test]
    fn test_nested_message_is_kept_even_when_empty() {
        let message = TestMessage::new(vec![("inner", TestValue::Message(TestMessage::new(vec![])))]);
        let doc = parse(&message).unwrap();
        let inner = doc.child_nodes()[0];
        assert_eq!(inner.node_type(), NodeType::Element);
        assert!(inner.first_child().is_none());
    }

    #[test]
    fn test_map_entries_sorted_by_key() {
        let entry = |v: &'static str| TestMessage::new(vec![("v", scalar(v))]);
        let message = TestMessage::new(vec![(
            "lookup",
            TestValue::Map(vec![
                (Scalar::I32(10), entry("ten")),
                (Scalar::I32(2), entry("two")),
                (Scalar::I32(-1), entry("minus")),
            ]),
        )]);
        let doc = parse(&message).unwrap();
        let container = doc.child_nodes()[0];
        let keys: Vec<_> = container.children().map(|n| n.name()).collect();
        assert_eq!(keys, vec!["-1", "2", "10"]);
        assert_eq!(container.inner_text(), "minustwoten");
    }

    #[test]
    fn test_empty_map_key_is_rejected() {
        let message = TestMessage::new(vec![(
            "labels",
            TestValue::Map(vec![
                (Scalar::from("home"), TestMessage::new(vec![])),
                (Scalar::from(""), TestMessage::new(vec![])),
            ]),
        )]);
        let err = parse(&message).unwrap_err();
        assert_eq!(
            err,
            ProtoQueryError::UnsupportedFieldKind {
                field: "labels".to_string(),
                kind: "map entry with an empty key".to_string(),
            }
        );
    }

    #[test]
    fn test_unsupported_kind_fails_without_partial_tree() {
        let message = TestMessage::new(vec![
            ("name", scalar("x")),
            ("nested", TestValue::Message(TestMessage::new(vec![("blob", TestValue::Unsupported("group"))]))),
        ]);
        let err = parse(&message).unwrap_err();
        assert_eq!(
            err,
            ProtoQueryError::UnsupportedFieldKind {
                field: "blob".to_string(),
                kind: "group".to_string(),
            }
        );
    }
}
