//! Schema resolution: from a class to the form fields describing it.

pub mod builder;
pub mod datatype;
pub mod descriptor;
pub mod expression;
pub mod inference;
pub mod labels;
pub mod selectable;

pub use builder::{build_schema, SchemaBuilder};
pub use descriptor::{
    DatatypeProperty, FieldDescriptor, FieldShape, FieldStatus, RestrictionSummary, SelectOption,
    SubclassEntry, SubclassInfo,
};
pub use labels::{resolve_labels, Labels};
