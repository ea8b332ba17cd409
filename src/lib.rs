//! Typed binding of a restricted, indentation-based YAML dialect.
//!
//! Documents are reduced into an ordered [`Mapping`] tree and then bound into
//! types that describe themselves through [`Yamlify`].

pub use binding::{Binding, Field, RecordBuilder, Yamlify};
pub use budget::{Budget, BudgetBreach};
pub use error::Error;
pub use instantiate::Arguments;
pub use location::Location;
pub use node::{Entry, Mapping, Node, SEQUENCE_MARKER, Scalar, is_synthetic_key};
pub use options::Options;
pub use parser::{
    FolderSequence, Sequence, YamlParser, from_reader, from_str, from_str_with_options,
    list_from_str, read_source,
};
pub use reducer::parse_document;
pub use registry::resolve;

mod binding;
pub mod budget;
pub mod convert;
mod error;
mod instantiate;
mod lines;
mod location;
mod macros;
mod node;
pub mod options;
mod parser;
mod reducer;
pub mod registry;
mod scalars;
mod snippet;
