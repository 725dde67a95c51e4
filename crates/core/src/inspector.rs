use crate::annotation::{self, FromAnnotationValue};
use crate::format::{FormatTable, TypeWithFormat};
use crate::subtype::SubtypeTester;
use schemascope_api::{
    AnnotatedType, AnnotationInstance, DotName, IndexView, IntoAnnotationTarget, RuntimeTypes,
    TypeRef,
};

/// Single entry point for a scanner: schema classification, subtype tests and annotation lookups.
///
/// Holds only shared references, so one inspector can serve any number of threads.
#[derive(Clone, Copy)]
pub struct TypeInspector<'a> {
    formats: &'a FormatTable,
    index: &'a dyn IndexView,
    runtime: &'a dyn RuntimeTypes,
}

impl<'a> TypeInspector<'a> {
    /// An inspector over the process-wide format table.
    pub fn new(index: &'a dyn IndexView, runtime: &'a dyn RuntimeTypes) -> Self {
        Self::with_formats(FormatTable::global(), index, runtime)
    }

    pub fn with_formats(
        formats: &'a FormatTable,
        index: &'a dyn IndexView,
        runtime: &'a dyn RuntimeTypes,
    ) -> Self {
        Self {
            formats,
            index,
            runtime,
        }
    }

    pub fn index(&self) -> &'a dyn IndexView {
        self.index
    }

    pub fn classify(&self, ty: &TypeRef) -> TypeWithFormat {
        self.formats.classify(ty)
    }

    pub fn is_subtype(&self, subject: &TypeRef, target: &TypeRef) -> bool {
        SubtypeTester::new(self.index, self.runtime).is_subtype(subject, target)
    }

    pub fn annotations_of<'t>(
        &self,
        target: impl IntoAnnotationTarget<'t>,
    ) -> Vec<&'t AnnotationInstance> {
        annotation::annotations_of(target)
    }

    pub fn find_annotation<'t>(
        &self,
        target: impl IntoAnnotationTarget<'t>,
        name: &str,
    ) -> Option<&'t AnnotationInstance> {
        annotation::find(target, name)
    }

    pub fn schema_annotation<'t>(
        &self,
        target: impl IntoAnnotationTarget<'t>,
    ) -> Option<&'t AnnotationInstance> {
        annotation::schema_annotation(target)
    }

    pub fn type_annotation<'t>(
        &self,
        ty: &AnnotatedType<'t>,
        name: &str,
    ) -> Option<&'t AnnotationInstance> {
        annotation::type_annotation(ty, name)
    }

    pub fn annotation_value<'t, T: FromAnnotationValue>(
        &self,
        target: impl IntoAnnotationTarget<'t>,
        name: &str,
        property: &str,
        default: T,
    ) -> T {
        annotation::value_of(target, name, property, default)
    }

    pub fn declaring_class<'t>(&self, target: impl IntoAnnotationTarget<'t>) -> Option<&'t DotName> {
        annotation::declaring_class(target)
    }
}
