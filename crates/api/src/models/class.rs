use super::annotation::{AnnotatedType, AnnotationInstance, AnnotationSite};
use super::name::DotName;
use super::types::TypeRef;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Enum,
    Annotation,
}

/// Static metadata of one indexed class.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct ClassInfo {
    #[schemars(with = "String")]
    pub name: DotName,
    #[serde(default)]
    pub kind: ClassKind,
    /// `None` only for `java.lang.Object` (and, in hand-built indexes, for roots).
    #[serde(default)]
    pub super_class: Option<TypeRef>,
    #[serde(default)]
    pub interfaces: Vec<TypeRef>,
    /// Annotations declared on the class itself.
    #[serde(default)]
    pub annotations: Vec<AnnotationInstance>,
    #[serde(default)]
    pub fields: Vec<FieldInfo>,
    #[serde(default)]
    pub methods: Vec<MethodInfo>,
}

impl ClassInfo {
    pub fn new(name: impl Into<DotName>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Class,
            super_class: None,
            interfaces: Vec::new(),
            annotations: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: ClassKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn extends(mut self, super_class: TypeRef) -> Self {
        self.super_class = Some(super_class);
        self
    }

    pub fn implements(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn annotated(mut self, annotation: AnnotationInstance) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_field(mut self, mut field: FieldInfo) -> Self {
        field.declaring_class = self.name.clone();
        self.fields.push(field);
        self
    }

    pub fn with_method(mut self, mut method: MethodInfo) -> Self {
        method.declaring_class = self.name.clone();
        self.methods.push(method);
        self
    }

    /// Rewrites `declaring_class` of every member to this class.
    pub fn adopt_members(&mut self) {
        for field in &mut self.fields {
            field.declaring_class = self.name.clone();
        }
        for method in &mut self.methods {
            method.declaring_class = self.name.clone();
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// First method with the given name; overloads are not distinguished.
    pub fn method(&self, name: &str) -> Option<&MethodInfo> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct FieldInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    /// Filled in when the owning class is inserted into an index.
    #[serde(skip)]
    pub declaring_class: DotName,
    #[serde(default)]
    pub annotations: Vec<AnnotationInstance>,
    /// Type-use annotations written on the field's type, e.g. `@NotNull String name`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_annotations: Vec<AnnotationInstance>,
}

impl FieldInfo {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            declaring_class: DotName::default(),
            annotations: Vec::new(),
            type_annotations: Vec::new(),
        }
    }

    pub fn annotated(mut self, annotation: AnnotationInstance) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn type_annotated(mut self, annotation: AnnotationInstance) -> Self {
        self.type_annotations.push(annotation);
        self
    }

    pub fn annotated_type(&self) -> AnnotatedType<'_> {
        AnnotatedType::new(&self.type_ref, self.type_annotations.iter().collect())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct MethodInfo {
    pub name: String,
    #[serde(default)]
    pub return_type: Option<TypeRef>,
    #[serde(default)]
    pub parameters: Vec<TypeRef>,
    #[serde(skip)]
    pub declaring_class: DotName,
    /// Method annotations and parameter annotations, each recording its own site.
    #[serde(default)]
    pub annotations: Vec<AnnotationInstance>,
    /// Type-use annotations on the return type (site `method`) and on
    /// parameter types (site `method_parameter`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_annotations: Vec<AnnotationInstance>,
}

impl MethodInfo {
    pub fn new(name: impl Into<String>, parameters: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            return_type: None,
            parameters,
            declaring_class: DotName::default(),
            annotations: Vec::new(),
            type_annotations: Vec::new(),
        }
    }

    pub fn returning(mut self, return_type: TypeRef) -> Self {
        self.return_type = Some(return_type);
        self
    }

    pub fn annotated(mut self, annotation: AnnotationInstance) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn type_annotated(mut self, annotation: AnnotationInstance) -> Self {
        self.type_annotations.push(annotation);
        self
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    /// The return type with its type-use annotations; `None` for `void` and constructors.
    pub fn annotated_return_type(&self) -> Option<AnnotatedType<'_>> {
        let return_type = self.return_type.as_ref()?;
        let annotations = self
            .type_annotations
            .iter()
            .filter(|annotation| annotation.site == AnnotationSite::Method)
            .collect();
        Some(AnnotatedType::new(return_type, annotations))
    }
}
