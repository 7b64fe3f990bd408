//! Domain layer - Documents, records, tags and list formatting

pub mod format;
pub mod listitems;
pub mod node;
pub mod resolver;
pub mod schema;
pub mod tags;

pub use format::{FormatStyle, FormatTemplate};
pub use listitems::ListVariant;
pub use node::{Mapping, Node};
pub use resolver::Resolver;
pub use schema::{Record, RecordKind, Schema, SchemaRegistry};
pub use tags::TagRegistry;
