#![allow(dead_code, unused_imports)]

pub mod fixtures;

pub use fixtures::{ADDRESSBOOK_XML, AddressBook, PhoneNumber, PhoneType, Person, addressbook_sample};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The inner text of each node, in order.
pub fn texts(nodes: &[protoquery::Node<'_>]) -> Vec<String> {
    nodes.iter().map(|n| n.inner_text()).collect()
}
