//! Schema classification, subtype resolution and annotation lookup for
//! statically indexed Java types.
//!
//! # Components
//!
//! - [`format`] - maps well-known types to an OpenAPI schema type and format
//! - [`resolver`] - canonical names of arrays, wildcards and generics
//! - [`subtype`] - index-first subtype test with a runtime fallback
//! - [`annotation`] - annotations of classes, fields, methods and parameters
//! - [`inspector`] - [`TypeInspector`], combining all of the above

pub mod annotation;
pub mod format;
pub mod inspector;
pub mod logging;
pub mod resolver;
pub mod subtype;

pub use annotation::{FromAnnotationValue, SCHEMA};
pub use format::{DataFormat, FormatTable, SchemaType, TypeWithFormat};
pub use inspector::TypeInspector;
pub use resolver::{canonical_name, resolve_wildcard};
pub use subtype::{ChainOutcome, SubtypeTester, is_subtype};
