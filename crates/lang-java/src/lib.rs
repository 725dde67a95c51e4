//! Java runtime type system backed by compiled classes on a classpath.

pub mod classfile;
pub mod classpath;
pub mod error;
pub mod jdk;

pub use classpath::{ClasspathEntry, ClasspathTypes};
pub use error::ClasspathError;
pub use jdk::find_jdk_asset;
