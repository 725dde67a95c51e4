//! Reads the hierarchy of a compiled class with `ristretto_classfile`.

use crate::error::{ClasspathError, Result};
use ristretto_classfile::{ClassAccessFlags, ClassFile};
use schemascope_api::{DotName, RuntimeType};
use std::io::Cursor;

/// Parses class file bytes into the runtime view of `name`.
pub fn read_runtime_type(name: &DotName, bytes: Vec<u8>) -> Result<RuntimeType> {
    let malformed = |message: String| ClasspathError::ClassFormat {
        name: name.to_string(),
        message,
    };

    let class = ClassFile::from_bytes(&mut Cursor::new(bytes))
        .map_err(|e| malformed(format!("failed to parse class: {e:?}")))?;

    let class_name = |index: u16| -> Result<DotName> {
        class
            .constant_pool
            .try_get_class(index)
            .map(|internal| DotName::from_internal(&internal.to_string()))
            .map_err(|e| malformed(format!("bad class constant #{index}: {e:?}")))
    };

    // super_class is 0 only for java.lang.Object
    let super_class = match class.super_class {
        0 => None,
        index => Some(class_name(index)?),
    };
    let interfaces = class
        .interfaces
        .iter()
        .map(|index| class_name(*index))
        .collect::<Result<Vec<_>>>()?;

    Ok(RuntimeType {
        name: name.clone(),
        is_interface: class.access_flags.contains(ClassAccessFlags::INTERFACE),
        super_class,
        interfaces,
    })
}
