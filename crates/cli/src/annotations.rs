use schemascope_api::{
    AnnotatedType, AnnotationInstance, AnnotationTarget, ApiError, DotName, Index, IndexView,
    MethodParameterInfo,
};
use schemascope_core::annotation;
use std::path::Path;

pub fn run(
    index_path: &Path,
    class: &str,
    field: Option<&str>,
    method: Option<&str>,
    param: Option<u16>,
    type_use: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let index = Index::from_json_file(index_path)?;
    let class_info = index
        .class_by_name(&DotName::new(class))
        .ok_or_else(|| ApiError::ClassNotFound(class.to_string()))?;

    let target: AnnotationTarget<'_> = match (field, method) {
        (Some(field), _) => class_info
            .field(field)
            .ok_or_else(|| ApiError::InvalidArgument(format!("no field {field} in {class}")))?
            .into(),
        (None, Some(method)) => {
            let method_info = class_info.method(method).ok_or_else(|| {
                ApiError::InvalidArgument(format!("no method {method} in {class}"))
            })?;
            match param {
                Some(position) => MethodParameterInfo::new(method_info, position).into(),
                None => method_info.into(),
            }
        }
        (None, None) => class_info.into(),
    };

    let found: Vec<&AnnotationInstance> = if type_use {
        annotated_type(target)
            .ok_or_else(|| {
                ApiError::InvalidArgument(format!("selected element of {class} has no type"))
            })?
            .annotations
    } else {
        annotation::annotations_of(target)
    };
    println!("{}", serde_json::to_string_pretty(&found)?);
    Ok(())
}

fn annotated_type(target: AnnotationTarget<'_>) -> Option<AnnotatedType<'_>> {
    match target {
        AnnotationTarget::Class(_) => None,
        AnnotationTarget::Field(field) => Some(field.annotated_type()),
        AnnotationTarget::Method(method) => method.annotated_return_type(),
        AnnotationTarget::MethodParameter(parameter) => parameter.annotated_type(),
    }
}
