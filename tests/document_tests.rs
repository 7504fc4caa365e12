mod common;

use common::{ADDRESSBOOK_XML, AddressBook, Person, PhoneNumber, PhoneType, TestResult, addressbook_sample, init_logger};
use protoquery::xpath::navigator::{Navigator, NodeType as XPathNodeType};
use protoquery::{NodeNavigator, NodeType, create_navigator, parse};
use std::collections::HashMap;

/// Reads serialized XML back into an address book using the projection rules.
fn decode_addressbook(xml: &str) -> Result<AddressBook, Box<dyn std::error::Error>> {
    // The serializer emits several top-level elements, so wrap them for the XML parser.
    let body = xml.strip_prefix(r#"<?xml version="1.0"?>"#).ok_or("missing declaration")?;
    let wrapped = format!("<root>{}</root>", body);
    let tree = roxmltree::Document::parse(&wrapped)?;

    let mut book = AddressBook::default();
    for element in tree.root_element().children().filter(|n| n.is_element()) {
        match element.tag_name().name() {
            "people" => book.people.push(decode_person(element)?),
            "tags" => book.tags = element.children().filter_map(|n| n.text()).map(str::to_string).collect(),
            other => return Err(format!("unexpected element '{}'", other).into()),
        }
    }
    Ok(book)
}

fn decode_person(node: roxmltree::Node<'_, '_>) -> Result<Person, Box<dyn std::error::Error>> {
    let mut person = Person::default();
    for field in node.children().filter(|n| n.is_element()) {
        let text = field.text().unwrap_or_default();
        match field.tag_name().name() {
            "name" => person.name = text.to_string(),
            "id" => person.id = text.parse()?,
            "email" => person.email = text.to_string(),
            "age" => person.age = text.parse()?,
            "phones" => person.phones.push(decode_phone(field)?),
            other => return Err(format!("unexpected person field '{}'", other).into()),
        }
    }
    Ok(person)
}

fn decode_phone(node: roxmltree::Node<'_, '_>) -> Result<PhoneNumber, Box<dyn std::error::Error>> {
    let mut phone = PhoneNumber::default();
    for field in node.children().filter(|n| n.is_element()) {
        let text = field.text().unwrap_or_default();
        match field.tag_name().name() {
            "number" => phone.number = text.to_string(),
            "type" => {
                phone.r#type = match text.parse::<i32>()? {
                    0 => PhoneType::Mobile,
                    1 => PhoneType::Home,
                    2 => PhoneType::Work,
                    n => return Err(format!("unknown phone type {}", n).into()),
                }
            }
            other => return Err(format!("unexpected phone field '{}'", other).into()),
        }
    }
    Ok(phone)
}

#[test]
fn test_parse_addressbook_xml() -> TestResult {
    init_logger();
    let doc = parse(&addressbook_sample())?;
    assert_eq!(doc.child_nodes().len(), 6);
    assert_eq!(doc.name(), "tutorial.AddressBook");
    assert_eq!(doc.output_xml(), ADDRESSBOOK_XML);
    Ok(())
}

#[test]
fn test_round_trip_restores_populated_fields() -> TestResult {
    init_logger();
    let sample = addressbook_sample();
    let doc = parse(&sample)?;
    let decoded = decode_addressbook(&doc.output_xml())?;
    assert_eq!(decoded, sample);
    assert_eq!(decode_addressbook(ADDRESSBOOK_XML)?, sample);
    Ok(())
}

#[test]
fn test_default_fields_are_not_resurrected() -> TestResult {
    let doc = parse(&addressbook_sample())?;
    let jane = doc.child_nodes()[1];
    assert!(jane.select_element("email").is_none());
    let decoded = decode_addressbook(&doc.output_xml())?;
    assert_eq!(decoded.people[1].email, "");
    Ok(())
}

#[test]
fn test_repeated_scalar_projection() -> TestResult {
    let doc = parse(&addressbook_sample())?;
    let tags = doc.child_nodes()[5];
    assert_eq!(tags.name(), "tags");
    let items: Vec<_> = tags.children().collect();
    assert_eq!(items.len(), 3);
    for (item, expected) in items.iter().zip(["home", "private", "friends"]) {
        assert_eq!(item.name(), "element");
        assert_eq!(item.children().count(), 1);
        assert_eq!(item.first_child().map(|t| t.node_type()), Some(NodeType::Text));
        assert_eq!(item.value(), Some(expected));
    }
    Ok(())
}

#[test]
fn test_enums_are_numeric() -> TestResult {
    let doc = parse(&addressbook_sample())?;
    let jack = doc.child_nodes()[2];
    let phone_type = jack.select_element("phones").and_then(|p| p.select_element("type"));
    assert_eq!(phone_type.and_then(|t| t.value()), Some("2"));
    Ok(())
}

#[test]
fn test_navigator() -> TestResult {
    init_logger();
    let doc = parse(&addressbook_sample())?;
    let mut nav = create_navigator(&doc);
    nav.move_to_root();
    assert_eq!(nav.node_type(), XPathNodeType::Root);

    let expected_people: Vec<HashMap<&str, &str>> = vec![
        HashMap::from([("name", "John Doe"), ("id", "101"), ("email", "john@example.com"), ("age", "42")]),
        HashMap::from([("name", "Jane Doe"), ("id", "102"), ("age", "40")]),
    ];

    assert!(nav.move_to_child());
    while nav.current().name() != "people" && nav.move_to_next() {}

    for expected in &expected_people {
        assert_eq!(nav.current().name(), "people");
        assert!(nav.move_to_child());
        let mut seen = Vec::new();
        loop {
            let key = nav.current().name();
            assert!(!key.is_empty());
            let value = expected.get(key).ok_or_else(|| format!("key '{}' not expected", key))?;
            assert_eq!(nav.value(), **value);
            seen.push(key);
            if !nav.move_to_next() {
                break;
            }
        }
        for key in expected.keys() {
            assert!(seen.contains(key), "key '{}' not found in nodes", key);
        }
        assert!(nav.move_to_parent());
        assert!(nav.move_to_next());
    }

    assert!(nav.move_to_parent());
    assert_eq!(nav.current().node_type(), NodeType::Document);
    Ok(())
}

#[test]
fn test_navigator_axes_over_children() -> TestResult {
    let doc = parse(&addressbook_sample())?;
    let mut nav = create_navigator(&doc);

    assert!(nav.move_to_child());
    let mut forward = vec![nav.current()];
    while nav.move_to_next() {
        forward.push(nav.current());
    }
    assert_eq!(forward, doc.child_nodes());

    let mut backward = vec![nav.current()];
    while nav.move_to_previous() {
        backward.push(nav.current());
    }
    backward.reverse();
    assert_eq!(backward, forward);

    for child in doc.child_nodes() {
        let mut nav = NodeNavigator::new(child);
        assert!(nav.move_to_parent());
        assert_eq!(nav.current(), doc.root());
        let mut jumper = create_navigator(&doc);
        assert!(jumper.move_to(&NodeNavigator::new(child)));
        assert_eq!(jumper.current(), child);
    }
    Ok(())
}

#[test]
fn test_concurrent_readers_share_a_document() -> TestResult {
    let doc = parse(&addressbook_sample())?;
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let names = protoquery::query_all(&doc, "//people/name").unwrap();
                assert_eq!(names.len(), 5);
            });
        }
    });
    Ok(())
}
