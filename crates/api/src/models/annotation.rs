use super::class::{ClassInfo, FieldInfo, MethodInfo};
use super::name::DotName;
use super::types::TypeRef;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where an annotation instance was declared.
///
/// Parameter annotations are stored on their method, so the site is what
/// tells a method annotation apart from a parameter one.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnnotationSite {
    Class,
    Field,
    Method,
    MethodParameter { position: u16 },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct AnnotationInstance {
    #[schemars(with = "String")]
    pub name: DotName,
    pub site: AnnotationSite,
    /// Explicitly specified members, in declaration order.
    #[serde(default)]
    pub values: Vec<AnnotationMember>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct AnnotationMember {
    pub name: String,
    pub value: AnnotationValue,
}

impl AnnotationInstance {
    pub const VALUE: &'static str = "value";

    pub fn new(name: impl Into<DotName>, site: AnnotationSite) -> Self {
        Self {
            name: name.into(),
            site,
            values: Vec::new(),
        }
    }

    pub fn with_value(mut self, name: impl Into<String>, value: AnnotationValue) -> Self {
        self.values.push(AnnotationMember {
            name: name.into(),
            value,
        });
        self
    }

    pub fn value(&self, name: &str) -> Option<&AnnotationValue> {
        self.values
            .iter()
            .find(|member| member.name == name)
            .map(|member| &member.value)
    }

    pub fn is_parameter_at(&self, position: u16) -> bool {
        self.site == AnnotationSite::MethodParameter { position }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, JsonSchema)]
pub struct EnumConstant {
    #[schemars(with = "String")]
    pub type_name: DotName,
    pub constant: String,
}

/// A member value of an annotation instance.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AnnotationValue {
    Boolean(bool),
    Byte(i8),
    Char(char),
    Short(i16),
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Class(TypeRef),
    Enum(EnumConstant),
    Array(Vec<AnnotationValue>),
    Nested(AnnotationInstance),
}

/// A method parameter, identified by its owning method and ordinal position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodParameterInfo<'a> {
    pub method: &'a MethodInfo,
    pub position: u16,
}

impl<'a> MethodParameterInfo<'a> {
    pub fn new(method: &'a MethodInfo, position: u16) -> Self {
        Self { method, position }
    }

    pub fn type_ref(&self) -> Option<&'a TypeRef> {
        self.method.parameters.get(usize::from(self.position))
    }

    /// The parameter's type with the type-use annotations recorded at this position.
    pub fn annotated_type(&self) -> Option<AnnotatedType<'a>> {
        let type_ref = self.type_ref()?;
        let annotations = self
            .method
            .type_annotations
            .iter()
            .filter(|annotation| annotation.is_parameter_at(self.position))
            .collect();
        Some(AnnotatedType::new(type_ref, annotations))
    }
}

/// A type at one place of use, with the type-use annotations written on it
/// there (`List<@NotNull String>` annotates the argument, not `List`).
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedType<'a> {
    pub type_ref: &'a TypeRef,
    pub annotations: Vec<&'a AnnotationInstance>,
}

impl<'a> AnnotatedType<'a> {
    pub fn new(type_ref: &'a TypeRef, annotations: Vec<&'a AnnotationInstance>) -> Self {
        Self {
            type_ref,
            annotations,
        }
    }

    /// A type carrying no annotations.
    pub fn bare(type_ref: &'a TypeRef) -> Self {
        Self::new(type_ref, Vec::new())
    }
}

/// Any program element that can carry annotations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnnotationTarget<'a> {
    Class(&'a ClassInfo),
    Field(&'a FieldInfo),
    Method(&'a MethodInfo),
    MethodParameter(MethodParameterInfo<'a>),
}

impl<'a> From<&'a ClassInfo> for AnnotationTarget<'a> {
    fn from(value: &'a ClassInfo) -> Self {
        AnnotationTarget::Class(value)
    }
}

impl<'a> From<&'a FieldInfo> for AnnotationTarget<'a> {
    fn from(value: &'a FieldInfo) -> Self {
        AnnotationTarget::Field(value)
    }
}

impl<'a> From<&'a MethodInfo> for AnnotationTarget<'a> {
    fn from(value: &'a MethodInfo) -> Self {
        AnnotationTarget::Method(value)
    }
}

impl<'a> From<MethodParameterInfo<'a>> for AnnotationTarget<'a> {
    fn from(value: MethodParameterInfo<'a>) -> Self {
        AnnotationTarget::MethodParameter(value)
    }
}

/// Anything that names an annotation target, possibly absent.
///
/// Implemented for the borrowed elements themselves and for `Option`s of them,
/// so lookups accept both `&field` and `Option<&FieldInfo>`.
pub trait IntoAnnotationTarget<'a> {
    fn into_annotation_target(self) -> Option<AnnotationTarget<'a>>;
}

impl<'a> IntoAnnotationTarget<'a> for AnnotationTarget<'a> {
    fn into_annotation_target(self) -> Option<AnnotationTarget<'a>> {
        Some(self)
    }
}

impl<'a> IntoAnnotationTarget<'a> for &'a ClassInfo {
    fn into_annotation_target(self) -> Option<AnnotationTarget<'a>> {
        Some(AnnotationTarget::Class(self))
    }
}

impl<'a> IntoAnnotationTarget<'a> for &'a FieldInfo {
    fn into_annotation_target(self) -> Option<AnnotationTarget<'a>> {
        Some(AnnotationTarget::Field(self))
    }
}

impl<'a> IntoAnnotationTarget<'a> for &'a MethodInfo {
    fn into_annotation_target(self) -> Option<AnnotationTarget<'a>> {
        Some(AnnotationTarget::Method(self))
    }
}

impl<'a> IntoAnnotationTarget<'a> for MethodParameterInfo<'a> {
    fn into_annotation_target(self) -> Option<AnnotationTarget<'a>> {
        Some(AnnotationTarget::MethodParameter(self))
    }
}

impl<'a, T: IntoAnnotationTarget<'a>> IntoAnnotationTarget<'a> for Option<T> {
    fn into_annotation_target(self) -> Option<AnnotationTarget<'a>> {
        self.and_then(IntoAnnotationTarget::into_annotation_target)
    }
}
