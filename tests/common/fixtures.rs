//! A hand-written address book in the shape of generated protobuf code.

use protoquery::{Field, FieldValue, ReflectMessage, Scalar};
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum PhoneType {
    #[default]
    Mobile = 0,
    Home = 1,
    Work = 2,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhoneNumber {
    pub number: String,
    pub r#type: PhoneType,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Person {
    pub name: String,
    pub id: i32,
    pub email: String,
    pub age: i32,
    pub phones: Vec<PhoneNumber>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AddressBook {
    pub people: Vec<Person>,
    pub tags: Vec<String>,
}

/// A scalar field, reported only when it is populated.
fn scalar<'a>(name: &'static str, value: impl Into<Scalar<'a>>) -> Option<Field<'a>> {
    let value = value.into();
    (!value.is_default()).then(|| Field::new(name, FieldValue::Scalar(value)))
}

fn messages<'a, M: ReflectMessage>(name: &'static str, items: &'a [M]) -> Option<Field<'a>> {
    let items: Vec<&dyn ReflectMessage> = items.iter().map(|m| m as &dyn ReflectMessage).collect();
    (!items.is_empty()).then(|| Field::new(name, FieldValue::RepeatedMessage(items)))
}

impl ReflectMessage for PhoneNumber {
    fn full_name(&self) -> Cow<'_, str> {
        Cow::Borrowed("tutorial.Person.PhoneNumber")
    }

    fn fields(&self) -> Box<dyn Iterator<Item = Field<'_>> + '_> {
        let fields = [
            scalar("number", self.number.as_str()),
            scalar("type", Scalar::Enum(self.r#type as i32)),
        ];
        Box::new(fields.into_iter().flatten())
    }
}

impl ReflectMessage for Person {
    fn full_name(&self) -> Cow<'_, str> {
        Cow::Borrowed("tutorial.Person")
    }

    fn fields(&self) -> Box<dyn Iterator<Item = Field<'_>> + '_> {
        let fields = [
            scalar("name", self.name.as_str()),
            scalar("id", self.id),
            scalar("email", self.email.as_str()),
            scalar("age", self.age),
            messages("phones", &self.phones),
        ];
        Box::new(fields.into_iter().flatten())
    }
}

impl ReflectMessage for AddressBook {
    fn full_name(&self) -> Cow<'_, str> {
        Cow::Borrowed("tutorial.AddressBook")
    }

    fn fields(&self) -> Box<dyn Iterator<Item = Field<'_>> + '_> {
        let tags: Vec<Scalar<'_>> = self.tags.iter().map(|t| Scalar::from(t.as_str())).collect();
        let tags = (!tags.is_empty()).then(|| Field::new("tags", FieldValue::RepeatedScalar(tags)));
        Box::new([messages("people", &self.people), tags].into_iter().flatten())
    }
}

fn phone(number: &str, r#type: PhoneType) -> PhoneNumber {
    PhoneNumber {
        number: number.to_string(),
        r#type,
    }
}

fn person(name: &str, id: i32, email: &str, age: i32, phones: Vec<PhoneNumber>) -> Person {
    Person {
        name: name.to_string(),
        id,
        email: email.to_string(),
        age,
        phones,
    }
}

/// Five people, three of them with phones, and three tags.
pub fn addressbook_sample() -> AddressBook {
    AddressBook {
        people: vec![
            person("John Doe", 101, "john@example.com", 42, vec![]),
            person("Jane Doe", 102, "", 40, vec![]),
            person(
                "Jack Doe",
                201,
                "jack@example.com",
                12,
                vec![phone("555-555-5555", PhoneType::Work)],
            ),
            person(
                "Jack Buck",
                301,
                "buck@example.com",
                19,
                vec![
                    phone("555-555-0000", PhoneType::Home),
                    phone("555-555-0001", PhoneType::Mobile),
                    phone("555-555-0002", PhoneType::Work),
                ],
            ),
            person(
                "Janet Doe",
                1001,
                "janet@example.com",
                16,
                vec![
                    phone("555-777-0000", PhoneType::Mobile),
                    phone("555-777-0001", PhoneType::Home),
                ],
            ),
        ],
        tags: vec!["home".to_string(), "private".to_string(), "friends".to_string()],
    }
}

/// The serialized form of [`addressbook_sample`].
pub const ADDRESSBOOK_XML: &str = concat!(
    r#"<?xml version="1.0"?>"#,
    "<people><name>John Doe</name><id>101</id><email>john@example.com</email><age>42</age></people>",
    "<people><name>Jane Doe</name><id>102</id><age>40</age></people>",
    "<people><name>Jack Doe</name><id>201</id><email>jack@example.com</email><age>12</age>",
    "<phones><number>555-555-5555</number><type>2</type></phones></people>",
    "<people><name>Jack Buck</name><id>301</id><email>buck@example.com</email><age>19</age>",
    "<phones><number>555-555-0000</number><type>1</type></phones>",
    "<phones><number>555-555-0001</number></phones>",
    "<phones><number>555-555-0002</number><type>2</type></phones></people>",
    "<people><name>Janet Doe</name><id>1001</id><email>janet@example.com</email><age>16</age>",
    "<phones><number>555-777-0000</number></phones>",
    "<phones><number>555-777-0001</number><type>1</type></phones></people>",
    "<tags><element>home</element><element>private</element><element>friends</element></tags>",
);
