use super::name::DotName;
use crate::error::ApiError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Java primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 8] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Byte,
        PrimitiveKind::Char,
        PrimitiveKind::Short,
        PrimitiveKind::Int,
        PrimitiveKind::Long,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
    ];

    /// Source keyword, which is also the primitive's canonical name.
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
        }
    }

    /// The boxed counterpart in `java.lang`.
    pub fn wrapper(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "java.lang.Boolean",
            PrimitiveKind::Byte => "java.lang.Byte",
            PrimitiveKind::Char => "java.lang.Character",
            PrimitiveKind::Short => "java.lang.Short",
            PrimitiveKind::Int => "java.lang.Integer",
            PrimitiveKind::Long => "java.lang.Long",
            PrimitiveKind::Float => "java.lang.Float",
            PrimitiveKind::Double => "java.lang.Double",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == keyword)
    }
}

/// Discriminator of [`TypeRef`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Primitive,
    Class,
    Array,
    Wildcard,
    Parameterized,
    TypeVariable,
}

/// A reference to a declared type as recorded in static metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeRef {
    Primitive {
        primitive: PrimitiveKind,
    },

    Class {
        #[schemars(with = "String")]
        name: DotName,
    },

    /// Array of `component` (the element type, never itself an array).
    Array {
        component: Box<TypeRef>,
        #[serde(default = "one")]
        dimensions: u32,
    },

    /// `?`, `? extends T` (upper bound) or `? super T` (lower bound).
    Wildcard {
        #[serde(default)]
        bound: Option<Box<TypeRef>>,
        #[serde(default = "yes")]
        is_upper_bound: bool,
    },

    /// Generic instantiation, e.g. `List<String>`.
    Parameterized {
        #[schemars(with = "String")]
        name: DotName,
        #[serde(default)]
        arguments: Vec<TypeRef>,
    },

    TypeVariable {
        identifier: String,
        #[serde(default)]
        bounds: Vec<TypeRef>,
    },
}

fn one() -> u32 {
    1
}

fn yes() -> bool {
    true
}

impl TypeRef {
    pub fn primitive(primitive: PrimitiveKind) -> Self {
        TypeRef::Primitive { primitive }
    }

    pub fn class(name: impl Into<DotName>) -> Self {
        TypeRef::Class { name: name.into() }
    }

    /// Builds an array type, flattening nested arrays into one component with summed dimensions.
    pub fn array(component: TypeRef, dimensions: u32) -> Self {
        match component {
            TypeRef::Array {
                component: inner,
                dimensions: inner_dims,
            } => TypeRef::Array {
                component: inner,
                dimensions: inner_dims + dimensions,
            },
            component => TypeRef::Array {
                component: Box::new(component),
                dimensions,
            },
        }
    }

    pub fn unbounded_wildcard() -> Self {
        TypeRef::Wildcard {
            bound: None,
            is_upper_bound: true,
        }
    }

    pub fn wildcard_extends(bound: TypeRef) -> Self {
        TypeRef::Wildcard {
            bound: Some(Box::new(bound)),
            is_upper_bound: true,
        }
    }

    pub fn wildcard_super(bound: TypeRef) -> Self {
        TypeRef::Wildcard {
            bound: Some(Box::new(bound)),
            is_upper_bound: false,
        }
    }

    pub fn parameterized(name: impl Into<DotName>, arguments: Vec<TypeRef>) -> Self {
        TypeRef::Parameterized {
            name: name.into(),
            arguments,
        }
    }

    pub fn type_variable(identifier: impl Into<String>, bounds: Vec<TypeRef>) -> Self {
        TypeRef::TypeVariable {
            identifier: identifier.into(),
            bounds,
        }
    }

    pub fn object() -> Self {
        TypeRef::Class {
            name: DotName::OBJECT,
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            TypeRef::Primitive { .. } => TypeKind::Primitive,
            TypeRef::Class { .. } => TypeKind::Class,
            TypeRef::Array { .. } => TypeKind::Array,
            TypeRef::Wildcard { .. } => TypeKind::Wildcard,
            TypeRef::Parameterized { .. } => TypeKind::Parameterized,
            TypeRef::TypeVariable { .. } => TypeKind::TypeVariable,
        }
    }

    /// The declared name, before any array or wildcard stripping.
    ///
    /// Arrays report their component's name with one `[]` per dimension, wildcards
    /// report `?`. Use the resolver's canonical name for lookups.
    pub fn name(&self) -> DotName {
        match self {
            TypeRef::Primitive { primitive } => DotName::new(primitive.name()),
            TypeRef::Class { name } | TypeRef::Parameterized { name, .. } => name.clone(),
            TypeRef::Array {
                component,
                dimensions,
            } => {
                let mut name = component.name().as_str().to_string();
                for _ in 0..*dimensions {
                    name.push_str("[]");
                }
                DotName::from(name)
            }
            TypeRef::Wildcard { .. } => DotName::new("?"),
            TypeRef::TypeVariable { bounds, .. } => bounds
                .first()
                .map(TypeRef::name)
                .unwrap_or(DotName::OBJECT),
        }
    }

    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self {
            TypeRef::Primitive { primitive } => Some(*primitive),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, TypeRef::Array { .. })
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive { primitive } => f.write_str(primitive.name()),
            TypeRef::Class { name } => write!(f, "{name}"),
            TypeRef::Array {
                component,
                dimensions,
            } => {
                write!(f, "{component}")?;
                for _ in 0..*dimensions {
                    f.write_str("[]")?;
                }
                Ok(())
            }
            TypeRef::Wildcard {
                bound: None,
                ..
            } => f.write_str("?"),
            TypeRef::Wildcard {
                bound: Some(bound),
                is_upper_bound,
            } => {
                let keyword = if *is_upper_bound { "extends" } else { "super" };
                write!(f, "? {keyword} {bound}")
            }
            TypeRef::Parameterized { name, arguments } => {
                write!(f, "{name}<")?;
                for (i, arg) in arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
            TypeRef::TypeVariable { identifier, .. } => f.write_str(identifier),
        }
    }
}

impl FromStr for TypeRef {
    type Err = ApiError;

    /// Parses a Java source type expression such as `java.util.Map<java.lang.String, ? extends java.lang.Number>[]`.
    ///
    /// Single-segment names that are not primitives are read as classes in the default package.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = TypeParser {
            input: s,
            pos: 0,
            depth: 0,
        };
        let ty = parser.parse_type()?;
        parser.skip_ws();
        if parser.pos != s.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(ty)
    }
}

/// Deepest nesting of type arguments and wildcard bounds accepted by the parser.
const MAX_NESTING: usize = 128;

struct TypeParser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl TypeParser<'_> {
    fn parse_type(&mut self) -> Result<TypeRef, ApiError> {
        if self.depth >= MAX_NESTING {
            return Err(self.error("type expression nested too deeply"));
        }
        self.depth += 1;
        let ty = self.parse_type_at_depth();
        self.depth -= 1;
        ty
    }

    fn parse_type_at_depth(&mut self) -> Result<TypeRef, ApiError> {
        self.skip_ws();
        if self.eat('?') {
            return self.parse_wildcard();
        }

        let name = self.parse_name()?;
        self.skip_ws();
        let base = if self.eat('<') {
            let mut arguments = vec![self.parse_type()?];
            self.skip_ws();
            while self.eat(',') {
                arguments.push(self.parse_type()?);
                self.skip_ws();
            }
            if !self.eat('>') {
                return Err(self.error("expected '>'"));
            }
            TypeRef::parameterized(name, arguments)
        } else if let Some(primitive) = PrimitiveKind::from_keyword(&name) {
            TypeRef::primitive(primitive)
        } else {
            TypeRef::class(name)
        };

        let mut dimensions = 0;
        loop {
            self.skip_ws();
            if !self.eat('[') {
                break;
            }
            self.skip_ws();
            if !self.eat(']') {
                return Err(self.error("expected ']'"));
            }
            dimensions += 1;
        }

        Ok(if dimensions > 0 {
            TypeRef::array(base, dimensions)
        } else {
            base
        })
    }

    fn parse_wildcard(&mut self) -> Result<TypeRef, ApiError> {
        self.skip_ws();
        let rest = &self.input[self.pos..];
        if let Some(after) = rest.strip_prefix("extends") {
            if after.starts_with(char::is_whitespace) {
                self.pos += "extends".len();
                return Ok(TypeRef::wildcard_extends(self.parse_type()?));
            }
        }
        if let Some(after) = rest.strip_prefix("super") {
            if after.starts_with(char::is_whitespace) {
                self.pos += "super".len();
                return Ok(TypeRef::wildcard_super(self.parse_type()?));
            }
        }
        Ok(TypeRef::unbounded_wildcard())
    }

    fn parse_name(&mut self) -> Result<String, ApiError> {
        let start = self.pos;
        let len = self.input[start..]
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$' || c == '.'))
            .unwrap_or(self.input.len() - start);
        let name = &self.input[start..start + len];
        if name.is_empty() || name.starts_with('.') || name.ends_with('.') || name.contains("..") {
            return Err(self.error("expected a type name"));
        }
        self.pos += len;
        Ok(name.to_string())
    }

    fn skip_ws(&mut self) {
        let rest = &self.input[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, c: char) -> bool {
        if self.input[self.pos..].starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn error(&self, message: &str) -> ApiError {
        ApiError::InvalidArgument(format!(
            "{message} at offset {} in type expression '{}'",
            self.pos, self.input
        ))
    }
}
