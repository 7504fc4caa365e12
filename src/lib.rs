//! Run XPath queries against reflective protobuf messages.
//!
//! A message is projected once into an immutable [`Document`] of named element
//! and text nodes, which a [`NodeNavigator`] then exposes to the XPath engine:
//!
//! ```ignore
//! let doc = protoquery::parse(&message)?;
//! for id in protoquery::query_all(&doc, "//people[contains(name, 'Jack')]/id")? {
//!     println!("{}", id.inner_text());
//! }
//! ```

pub mod builder;
pub mod cache;
pub mod config;
pub mod error;
pub mod format;
pub mod navigator;
pub mod node;
pub mod query;
pub mod reflect;
pub mod selector;
pub mod xml;

pub use builder::parse;
pub use cache::{SelectorCache, selector_cache_disabled, set_disable_selector_cache};
pub use config::CacheConfig;
pub use error::{ProtoQueryError, Result};
pub use format::format_scalar;
pub use navigator::{NodeNavigator, create_navigator};
pub use node::{Children, Descendants, Document, Node, NodeId, NodeType};
pub use query::{QueryValue, evaluate, find, find_one, query, query_all, query_selector, query_selector_all};
pub use reflect::{Field, FieldValue, MapValue, ReflectMessage, Scalar};
pub use selector::Selector;
pub use xml::output_xml;

// The engine crate, for the `Navigator` trait and raw expression access.
pub use protoquery_xpath as xpath;
