//! Classification of Java types into OpenAPI schema types and formats.
//!
//! See <https://github.com/OAI/OpenAPI-Specification/blob/master/versions/3.0.0.md#dataTypeFormat>.

use crate::resolver;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use schemars::JsonSchema;
use schemascope_api::{DotName, PrimitiveKind, TypeRef};
use serde::Serialize;
use std::fmt;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
}

impl SchemaType {
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaType::String => "string",
            SchemaType::Number => "number",
            SchemaType::Integer => "integer",
            SchemaType::Boolean => "boolean",
            SchemaType::Array => "array",
            SchemaType::Object => "object",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
pub enum DataFormat {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "int32")]
    Int32,
    #[serde(rename = "int64")]
    Int64,
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "double")]
    Double,
    #[serde(rename = "byte")]
    Byte,
    #[serde(rename = "binary")]
    Binary,
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "date-time")]
    DateTime,
    #[serde(rename = "password")]
    Password,
}

impl DataFormat {
    /// The OpenAPI `format` string, `None` when no format applies.
    pub fn format(self) -> Option<&'static str> {
        match self {
            DataFormat::None => None,
            DataFormat::Int32 => Some("int32"),
            DataFormat::Int64 => Some("int64"),
            DataFormat::Float => Some("float"),
            DataFormat::Double => Some("double"),
            DataFormat::Byte => Some("byte"),
            DataFormat::Binary => Some("binary"),
            DataFormat::Date => Some("date"),
            DataFormat::DateTime => Some("date-time"),
            DataFormat::Password => Some("password"),
        }
    }

    pub fn has_format(self) -> bool {
        self != DataFormat::None
    }
}

/// A schema type paired with its format.
///
/// Only the constants in this module construct these, which keeps every
/// format compatible with its schema type.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
pub struct TypeWithFormat {
    #[serde(rename = "type")]
    schema_type: SchemaType,
    #[serde(skip_serializing_if = "is_none_format")]
    format: DataFormat,
}

fn is_none_format(format: &DataFormat) -> bool {
    !format.has_format()
}

impl TypeWithFormat {
    const fn new(schema_type: SchemaType, format: DataFormat) -> Self {
        Self {
            schema_type,
            format,
        }
    }

    pub fn schema_type(&self) -> SchemaType {
        self.schema_type
    }

    pub fn format(&self) -> DataFormat {
        self.format
    }
}

impl fmt::Display for TypeWithFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format.format() {
            Some(format) => write!(f, "{}/{}", self.schema_type, format),
            None => write!(f, "{}", self.schema_type),
        }
    }
}

const STRING_FORMAT: TypeWithFormat = TypeWithFormat::new(SchemaType::String, DataFormat::None);
const BYTE_FORMAT: TypeWithFormat = TypeWithFormat::new(SchemaType::String, DataFormat::Byte);
const CHAR_FORMAT: TypeWithFormat = TypeWithFormat::new(SchemaType::String, DataFormat::Byte);
// Could be any kind of number.
const NUMBER_FORMAT: TypeWithFormat = TypeWithFormat::new(SchemaType::Number, DataFormat::None);
const BIGDECIMAL_FORMAT: TypeWithFormat = TypeWithFormat::new(SchemaType::Number, DataFormat::None);
const DOUBLE_FORMAT: TypeWithFormat = TypeWithFormat::new(SchemaType::Number, DataFormat::Double);
const FLOAT_FORMAT: TypeWithFormat = TypeWithFormat::new(SchemaType::Number, DataFormat::Float);
const BIGINTEGER_FORMAT: TypeWithFormat = TypeWithFormat::new(SchemaType::Integer, DataFormat::None);
const INTEGER_FORMAT: TypeWithFormat = TypeWithFormat::new(SchemaType::Integer, DataFormat::Int32);
const LONG_FORMAT: TypeWithFormat = TypeWithFormat::new(SchemaType::Integer, DataFormat::Int64);
const SHORT_FORMAT: TypeWithFormat = TypeWithFormat::new(SchemaType::Integer, DataFormat::None);
const BOOLEAN_FORMAT: TypeWithFormat = TypeWithFormat::new(SchemaType::Boolean, DataFormat::None);
const DATE_FORMAT: TypeWithFormat = TypeWithFormat::new(SchemaType::String, DataFormat::Date);
const DATE_TIME_FORMAT: TypeWithFormat = TypeWithFormat::new(SchemaType::String, DataFormat::DateTime);
const ARRAY_FORMAT: TypeWithFormat = TypeWithFormat::new(SchemaType::Array, DataFormat::None);
const OBJECT_FORMAT: TypeWithFormat = TypeWithFormat::new(SchemaType::Object, DataFormat::None);

const STANDARD_ENTRIES: &[(&str, TypeWithFormat)] = &[
    // String
    ("java.lang.String", STRING_FORMAT),
    ("java.lang.StringBuffer", STRING_FORMAT),
    ("java.lang.StringBuilder", STRING_FORMAT),
    ("java.lang.CharSequence", STRING_FORMAT),
    // B64 string
    ("java.lang.Byte", BYTE_FORMAT),
    ("byte", BYTE_FORMAT),
    ("java.lang.Character", CHAR_FORMAT),
    ("char", CHAR_FORMAT),
    // Number
    ("java.lang.Number", NUMBER_FORMAT),
    // Decimal
    ("java.math.BigDecimal", BIGDECIMAL_FORMAT),
    ("java.lang.Double", DOUBLE_FORMAT),
    ("double", DOUBLE_FORMAT),
    ("java.lang.Float", FLOAT_FORMAT),
    ("float", FLOAT_FORMAT),
    // Integer
    ("java.math.BigInteger", BIGINTEGER_FORMAT),
    ("java.lang.Integer", INTEGER_FORMAT),
    ("int", INTEGER_FORMAT),
    ("java.lang.Long", LONG_FORMAT),
    ("long", LONG_FORMAT),
    ("java.lang.Short", SHORT_FORMAT),
    ("short", SHORT_FORMAT),
    // Boolean
    ("java.lang.Boolean", BOOLEAN_FORMAT),
    ("boolean", BOOLEAN_FORMAT),
    // Date
    ("java.util.Date", DATE_FORMAT),
    ("java.sql.Date", DATE_FORMAT),
    ("java.time.LocalDate", DATE_FORMAT),
    // Date time
    ("java.time.LocalDateTime", DATE_TIME_FORMAT),
    ("java.time.ZonedDateTime", DATE_TIME_FORMAT),
    ("java.time.OffsetDateTime", DATE_TIME_FORMAT),
];

static GLOBAL: Lazy<FormatTable> = Lazy::new(FormatTable::standard);

/// Immutable registry of well-known types and their schema classification.
#[derive(Debug, Clone)]
pub struct FormatTable {
    entries: IndexMap<DotName, TypeWithFormat>,
}

impl FormatTable {
    pub fn standard() -> Self {
        let entries = STANDARD_ENTRIES
            .iter()
            .map(|(name, format)| (DotName::new(name), *format))
            .collect();
        Self { entries }
    }

    /// Process-wide shared table, built on first use.
    pub fn global() -> &'static FormatTable {
        &GLOBAL
    }

    /// Classify a type reference.
    ///
    /// Arrays are always `array`, whatever their component. Types missing from
    /// the table are `object`.
    pub fn classify(&self, ty: &TypeRef) -> TypeWithFormat {
        if ty.is_array() {
            return ARRAY_FORMAT;
        }
        self.lookup(&resolver::canonical_name(ty))
            .unwrap_or(OBJECT_FORMAT)
    }

    pub fn classify_primitive(&self, primitive: PrimitiveKind) -> TypeWithFormat {
        self.lookup(&DotName::new(primitive.name()))
            .unwrap_or(OBJECT_FORMAT)
    }

    pub fn lookup(&self, name: &DotName) -> Option<TypeWithFormat> {
        self.entries.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DotName, &TypeWithFormat)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for FormatTable {
    fn default() -> Self {
        Self::standard()
    }
}

pub fn array_format() -> TypeWithFormat {
    ARRAY_FORMAT
}

pub fn object_format() -> TypeWithFormat {
    OBJECT_FORMAT
}

/// Classify against the global table.
pub fn classify(ty: &TypeRef) -> TypeWithFormat {
    FormatTable::global().classify(ty)
}
