//! Normalization of type references into lookup keys.

use schemascope_api::{DotName, PrimitiveKind, TypeRef};

/// The array- and wildcard-stripped name used to key the index, the runtime and the format table.
pub fn canonical_name(ty: &TypeRef) -> DotName {
    match ty {
        TypeRef::Array { component, .. } => canonical_name(component),
        TypeRef::Wildcard { .. } => canonical_name(&wildcard_bound(ty)),
        _ => ty.name(),
    }
}

/// The effective upper bound of a wildcard, `java.lang.Object` when none is declared.
///
/// `? super T` has no declared upper bound.
pub fn wildcard_bound(ty: &TypeRef) -> TypeRef {
    match ty {
        TypeRef::Wildcard {
            bound: Some(bound),
            is_upper_bound: true,
        } => (**bound).clone(),
        _ => TypeRef::object(),
    }
}

/// Replaces a wildcard by its upper bound; any other type is returned unchanged.
pub fn resolve_wildcard(ty: &TypeRef) -> TypeRef {
    match ty {
        TypeRef::Wildcard { .. } => wildcard_bound(ty),
        other => other.clone(),
    }
}

/// Same declared name, or a primitive and its wrapper in either order.
pub fn equal_types(a: &TypeRef, b: &TypeRef) -> bool {
    if a.name() == b.name() {
        return true;
    }
    equal_wrapped_types(a, b) || equal_wrapped_types(b, a)
}

pub fn equal_wrapped_types(primitive_candidate: &TypeRef, wrapped_candidate: &TypeRef) -> bool {
    match (primitive_candidate, wrapped_candidate) {
        (TypeRef::Primitive { primitive }, TypeRef::Class { .. }) => {
            is_primitive_wrapper(*primitive, wrapped_candidate)
        }
        _ => false,
    }
}

pub fn is_primitive_wrapper(primitive: PrimitiveKind, wrapped: &TypeRef) -> bool {
    wrapped.name() == primitive.wrapper()
}
