//! Uniform annotation lookup over classes, fields, methods and method parameters.
//!
//! Every lookup accepts an optional target; an absent target behaves like an
//! element with no annotations.

use schemascope_api::{
    AnnotatedType, AnnotationInstance, AnnotationTarget, AnnotationValue, ClassInfo, DotName,
    EnumConstant, IndexView, IntoAnnotationTarget, TypeRef,
};

/// The MicroProfile OpenAPI `@Schema` annotation.
pub const SCHEMA: DotName =
    DotName::from_static("org.eclipse.microprofile.openapi.annotations.media.Schema");

/// Annotations attached to `target`.
///
/// Classes report only their own annotations, never inherited ones. Parameter
/// annotations are recovered from the owning method, keeping those recorded
/// at this parameter's position.
pub fn annotations_of<'a>(
    target: impl IntoAnnotationTarget<'a>,
) -> Vec<&'a AnnotationInstance> {
    match target.into_annotation_target() {
        Some(AnnotationTarget::Class(class)) => class.annotations.iter().collect(),
        Some(AnnotationTarget::Field(field)) => field.annotations.iter().collect(),
        Some(AnnotationTarget::Method(method)) => method.annotations.iter().collect(),
        Some(AnnotationTarget::MethodParameter(parameter)) => parameter
            .method
            .annotations
            .iter()
            .filter(|annotation| annotation.is_parameter_at(parameter.position))
            .collect(),
        None => Vec::new(),
    }
}

/// First annotation on `target` named `name`.
pub fn find<'a>(
    target: impl IntoAnnotationTarget<'a>,
    name: &str,
) -> Option<&'a AnnotationInstance> {
    annotations_of(target)
        .into_iter()
        .find(|annotation| annotation.name == *name)
}

/// The `@Schema` annotation on `target`, if any.
pub fn schema_annotation<'a>(
    target: impl IntoAnnotationTarget<'a>,
) -> Option<&'a AnnotationInstance> {
    find(target, SCHEMA.as_str())
}

/// First type-use annotation named `name` on `ty`.
pub fn type_annotation<'a>(ty: &AnnotatedType<'a>, name: &str) -> Option<&'a AnnotationInstance> {
    ty.annotations
        .iter()
        .copied()
        .find(|annotation| annotation.name == *name)
}

/// The `@Schema` type-use annotation on `ty`, if any.
pub fn type_schema_annotation<'a>(ty: &AnnotatedType<'a>) -> Option<&'a AnnotationInstance> {
    type_annotation(ty, SCHEMA.as_str())
}

pub fn has_annotation<'a>(target: impl IntoAnnotationTarget<'a>, name: &str) -> bool {
    find(target, name).is_some()
}

/// The raw value of `property` in annotation `name` on `target`.
pub fn raw_value<'a>(
    target: impl IntoAnnotationTarget<'a>,
    name: &str,
    property: &str,
) -> Option<&'a AnnotationValue> {
    find(target, name)?.value(property)
}

/// Value of `property` in annotation `name` on `target`, or `default` when the
/// annotation or the property is missing or of another type.
pub fn value_of<'a, T: FromAnnotationValue>(
    target: impl IntoAnnotationTarget<'a>,
    name: &str,
    property: &str,
    default: T,
) -> T {
    raw_value(target, name, property)
        .and_then(T::from_annotation_value)
        .unwrap_or(default)
}

/// [`value_of`] for the annotation's `value` member.
pub fn value_of_default<'a, T: FromAnnotationValue>(
    target: impl IntoAnnotationTarget<'a>,
    name: &str,
    default: T,
) -> T {
    value_of(target, name, AnnotationInstance::VALUE, default)
}

/// Name of the class declaring `target`.
///
/// Classes have none, and neither do members never added to a class.
pub fn declaring_class<'a>(target: impl IntoAnnotationTarget<'a>) -> Option<&'a DotName> {
    let owner = match target.into_annotation_target()? {
        AnnotationTarget::Class(_) => return None,
        AnnotationTarget::Field(field) => &field.declaring_class,
        AnnotationTarget::Method(method) => &method.declaring_class,
        AnnotationTarget::MethodParameter(parameter) => &parameter.method.declaring_class,
    };
    (!owner.as_str().is_empty()).then_some(owner)
}

/// [`declaring_class`] resolved in `index`.
pub fn declaring_class_info<'i, 'a>(
    index: &'i dyn IndexView,
    target: impl IntoAnnotationTarget<'a>,
) -> Option<&'i ClassInfo> {
    declaring_class(target).and_then(|name| index.class_by_name(name))
}

/// Conversion out of an [`AnnotationValue`]; `None` when the value has another shape.
pub trait FromAnnotationValue: Sized {
    fn from_annotation_value(value: &AnnotationValue) -> Option<Self>;
}

impl FromAnnotationValue for bool {
    fn from_annotation_value(value: &AnnotationValue) -> Option<Self> {
        match value {
            AnnotationValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromAnnotationValue for char {
    fn from_annotation_value(value: &AnnotationValue) -> Option<Self> {
        match value {
            AnnotationValue::Char(c) => Some(*c),
            _ => None,
        }
    }
}

impl FromAnnotationValue for i32 {
    fn from_annotation_value(value: &AnnotationValue) -> Option<Self> {
        match value {
            AnnotationValue::Byte(v) => Some(i32::from(*v)),
            AnnotationValue::Short(v) => Some(i32::from(*v)),
            AnnotationValue::Integer(v) => Some(*v),
            AnnotationValue::Char(c) => Some(*c as i32),
            _ => None,
        }
    }
}

impl FromAnnotationValue for i64 {
    fn from_annotation_value(value: &AnnotationValue) -> Option<Self> {
        match value {
            AnnotationValue::Long(v) => Some(*v),
            other => i32::from_annotation_value(other).map(i64::from),
        }
    }
}

impl FromAnnotationValue for f64 {
    fn from_annotation_value(value: &AnnotationValue) -> Option<Self> {
        match value {
            AnnotationValue::Float(v) => Some(f64::from(*v)),
            AnnotationValue::Double(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromAnnotationValue for String {
    fn from_annotation_value(value: &AnnotationValue) -> Option<Self> {
        match value {
            AnnotationValue::String(s) => Some(s.clone()),
            AnnotationValue::Enum(e) => Some(e.constant.clone()),
            _ => None,
        }
    }
}

impl FromAnnotationValue for TypeRef {
    fn from_annotation_value(value: &AnnotationValue) -> Option<Self> {
        match value {
            AnnotationValue::Class(ty) => Some(ty.clone()),
            _ => None,
        }
    }
}

impl FromAnnotationValue for DotName {
    fn from_annotation_value(value: &AnnotationValue) -> Option<Self> {
        TypeRef::from_annotation_value(value).map(|ty| ty.name())
    }
}

impl FromAnnotationValue for EnumConstant {
    fn from_annotation_value(value: &AnnotationValue) -> Option<Self> {
        match value {
            AnnotationValue::Enum(e) => Some(e.clone()),
            _ => None,
        }
    }
}

impl FromAnnotationValue for AnnotationInstance {
    fn from_annotation_value(value: &AnnotationValue) -> Option<Self> {
        match value {
            AnnotationValue::Nested(nested) => Some(nested.clone()),
            _ => None,
        }
    }
}

impl FromAnnotationValue for AnnotationValue {
    fn from_annotation_value(value: &AnnotationValue) -> Option<Self> {
        Some(value.clone())
    }
}

/// Arrays convert element-wise; a single value is read as a one-element array,
/// as Java allows for annotation members.
impl<T: FromAnnotationValue> FromAnnotationValue for Vec<T> {
    fn from_annotation_value(value: &AnnotationValue) -> Option<Self> {
        match value {
            AnnotationValue::Array(items) => items.iter().map(T::from_annotation_value).collect(),
            single => T::from_annotation_value(single).map(|v| vec![v]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemascope_api::{
        AnnotationSite, FieldInfo, Index, MethodInfo, MethodParameterInfo, PrimitiveKind,
    };

    fn schema_required() -> AnnotationInstance {
        AnnotationInstance::new("Schema", AnnotationSite::Field)
            .with_value("required", AnnotationValue::Boolean(true))
    }

    #[test]
    fn test_value_of_literal_case() {
        let field = FieldInfo::new("name", TypeRef::class("java.lang.String"))
            .annotated(schema_required());
        assert!(value_of(&field, "Schema", "required", false));
        assert!(!value_of(&field, "Missing", "required", false));
        assert_eq!(value_of(&field, "Schema", "nullable", 7), 7);
        // Present but of another type.
        assert_eq!(value_of(&field, "Schema", "required", 7), 7);
    }

    #[test]
    fn test_absent_target_has_nothing() {
        let none: Option<AnnotationTarget<'_>> = None;
        assert!(annotations_of(none).is_empty());
        assert!(find(none, "Schema").is_none());
        assert_eq!(value_of(none, "Schema", "required", true), true);
        assert!(declaring_class(none).is_none());
    }

    #[test]
    fn test_parameter_annotations_exclude_siblings() {
        let method = MethodInfo::new(
            "update",
            vec![TypeRef::class("java.lang.String"), TypeRef::class("java.lang.String")],
        )
        .annotated(AnnotationInstance::new("PUT", AnnotationSite::Method))
        .annotated(
            AnnotationInstance::new("PathParam", AnnotationSite::MethodParameter { position: 0 })
                .with_value("value", AnnotationValue::String("id".into())),
        )
        .annotated(
            AnnotationInstance::new("PathParam", AnnotationSite::MethodParameter { position: 1 })
                .with_value("value", AnnotationValue::String("name".into())),
        );

        let second = MethodParameterInfo::new(&method, 1);
        let found = annotations_of(second);
        assert_eq!(found.len(), 1);
        assert_eq!(
            value_of_default(second, "PathParam", String::new()),
            "name".to_string()
        );
        assert!(find(second, "PUT").is_none());

        let third = MethodParameterInfo::new(&method, 2);
        assert!(annotations_of(third).is_empty());

        assert_eq!(annotations_of(&method).len(), 3);
    }

    #[test]
    fn test_find_returns_first_match() {
        let field = FieldInfo::new("f", TypeRef::class("a.B"))
            .annotated(
                AnnotationInstance::new("Tag", AnnotationSite::Field)
                    .with_value("value", AnnotationValue::Integer(1)),
            )
            .annotated(
                AnnotationInstance::new("Tag", AnnotationSite::Field)
                    .with_value("value", AnnotationValue::Integer(2)),
            );
        assert_eq!(value_of_default(&field, "Tag", 0), 1);
        assert!(has_annotation(&field, "Tag"));
    }

    #[test]
    fn test_class_annotations_and_declaring_class() {
        let index = Index::new().with_class(
            ClassInfo::new("app.Pet")
                .annotated(AnnotationInstance::new("Schema", AnnotationSite::Class))
                .with_field(FieldInfo::new("age", TypeRef::class("java.lang.Integer")))
                .with_method(MethodInfo::new("feed", vec![TypeRef::class("app.Food")])),
        );
        let pet = index.class_by_name(&DotName::new("app.Pet")).unwrap();

        assert_eq!(annotations_of(pet).len(), 1);
        assert!(declaring_class(pet).is_none());

        let age = pet.field("age").unwrap();
        assert_eq!(declaring_class(age).unwrap(), "app.Pet");

        let feed = pet.method("feed").unwrap();
        let food = MethodParameterInfo::new(feed, 0);
        assert_eq!(declaring_class_info(&index, food).unwrap().name, "app.Pet");
        assert_eq!(food.type_ref(), Some(&TypeRef::class("app.Food")));
    }

    #[test]
    fn test_schema_annotation_on_class_and_field() {
        let class = ClassInfo::new("app.Pet")
            .annotated(AnnotationInstance::new("javax.persistence.Entity", AnnotationSite::Class))
            .annotated(
                AnnotationInstance::new(SCHEMA, AnnotationSite::Class)
                    .with_value("name", AnnotationValue::String("Pet".into())),
            )
            .with_field(FieldInfo::new("id", TypeRef::primitive(PrimitiveKind::Long)));

        let schema = schema_annotation(&class).unwrap();
        assert_eq!(schema.value("name"), Some(&AnnotationValue::String("Pet".into())));
        assert!(schema_annotation(class.field("id")).is_none());

        let renamed = FieldInfo::new("x", TypeRef::class("a.B"))
            .annotated(AnnotationInstance::new("Schema", AnnotationSite::Field));
        // Matched by fully qualified name only.
        assert!(schema_annotation(&renamed).is_none());
    }

    #[test]
    fn test_type_use_annotations() {
        let field = FieldInfo::new("tags", TypeRef::class("java.util.List"))
            .annotated(AnnotationInstance::new("Deprecated", AnnotationSite::Field))
            .type_annotated(
                AnnotationInstance::new(SCHEMA, AnnotationSite::Field)
                    .with_value("maxItems", AnnotationValue::Integer(3)),
            );

        let ty = field.annotated_type();
        assert_eq!(ty.type_ref, &TypeRef::class("java.util.List"));
        assert!(type_annotation(&ty, "Deprecated").is_none());
        let schema = type_schema_annotation(&ty).unwrap();
        assert_eq!(schema.value("maxItems"), Some(&AnnotationValue::Integer(3)));
        // Element annotations and type-use annotations are kept apart.
        assert!(schema_annotation(&field).is_none());

        let bare = TypeRef::class("java.lang.String");
        assert!(type_schema_annotation(&AnnotatedType::bare(&bare)).is_none());
    }

    #[test]
    fn test_type_use_annotations_on_method_types() {
        let method = MethodInfo::new(
            "rename",
            vec![TypeRef::class("java.lang.Long"), TypeRef::class("java.lang.String")],
        )
        .returning(TypeRef::class("app.Pet"))
        .type_annotated(AnnotationInstance::new("NotNull", AnnotationSite::Method))
        .type_annotated(AnnotationInstance::new(
            "Size",
            AnnotationSite::MethodParameter { position: 1 },
        ));

        let returned = method.annotated_return_type().unwrap();
        assert!(type_annotation(&returned, "NotNull").is_some());
        assert!(type_annotation(&returned, "Size").is_none());

        let name = MethodParameterInfo::new(&method, 1).annotated_type().unwrap();
        assert_eq!(name.type_ref, &TypeRef::class("java.lang.String"));
        assert!(type_annotation(&name, "Size").is_some());
        assert!(type_annotation(&name, "NotNull").is_none());

        let id = MethodParameterInfo::new(&method, 0).annotated_type().unwrap();
        assert!(id.annotations.is_empty());
        assert!(MethodParameterInfo::new(&method, 2).annotated_type().is_none());

        assert!(MethodInfo::new("close", vec![]).annotated_return_type().is_none());
    }

    #[test]
    fn test_unowned_members_have_no_declaring_class() {
        let field = FieldInfo::new("loose", TypeRef::class("a.B"));
        assert!(declaring_class(&field).is_none());

        let method = MethodInfo::new("run", vec![TypeRef::class("a.B")]);
        assert!(declaring_class(&method).is_none());
        assert!(declaring_class(MethodParameterInfo::new(&method, 0)).is_none());

        let owned = ClassInfo::new("a.Owner").with_field(field);
        assert_eq!(declaring_class(owned.field("loose")).unwrap(), "a.Owner");
    }

    #[test]
    fn test_array_and_nested_values() {
        let field = FieldInfo::new("f", TypeRef::class("a.B")).annotated(
            AnnotationInstance::new("Schema", AnnotationSite::Field)
                .with_value(
                    "enumeration",
                    AnnotationValue::Array(vec![
                        AnnotationValue::String("a".into()),
                        AnnotationValue::String("b".into()),
                    ]),
                )
                .with_value("example", AnnotationValue::String("x".into()))
                .with_value(
                    "externalDocs",
                    AnnotationValue::Nested(
                        AnnotationInstance::new("ExternalDocumentation", AnnotationSite::Field)
                            .with_value("url", AnnotationValue::String("http://x".into())),
                    ),
                ),
        );

        let values: Vec<String> = value_of(&field, "Schema", "enumeration", vec![]);
        assert_eq!(values, vec!["a".to_string(), "b".to_string()]);

        let single: Vec<String> = value_of(&field, "Schema", "example", vec![]);
        assert_eq!(single, vec!["x".to_string()]);

        let docs: Option<AnnotationInstance> =
            raw_value(&field, "Schema", "externalDocs").and_then(AnnotationInstance::from_annotation_value);
        assert_eq!(docs.unwrap().name, "ExternalDocumentation");
    }
}
