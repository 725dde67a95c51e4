//! Read-only view over statically indexed class metadata.

use crate::error::{ApiError, ApiResult};
use crate::models::{ClassInfo, DotName};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Provides class metadata by canonical name.
///
/// Returning `None` means the class was not indexed, not that it does not exist.
pub trait IndexView: Send + Sync {
    fn class_by_name(&self, name: &DotName) -> Option<&ClassInfo>;

    /// All indexed classes, in no particular order unless the implementation says so.
    fn known_classes(&self) -> Box<dyn Iterator<Item = &ClassInfo> + '_>;

    fn len(&self) -> usize {
        self.known_classes().count()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// On-disk form of an [`Index`], as written by an external index builder.
#[derive(Serialize, Deserialize, Debug, Clone, Default, JsonSchema)]
pub struct IndexFile {
    pub classes: Vec<ClassInfo>,
}

/// In-memory index, iterating in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Index {
    classes: IndexMap<DotName, ClassInfo>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a class, replacing any previous entry with the same name.
    pub fn insert(&mut self, mut class: ClassInfo) -> Option<ClassInfo> {
        class.adopt_members();
        self.classes.insert(class.name.clone(), class)
    }

    pub fn with_class(mut self, class: ClassInfo) -> Self {
        self.insert(class);
        self
    }

    pub fn from_file(file: IndexFile) -> ApiResult<Self> {
        let mut index = Index::new();
        for class in file.classes {
            let name = class.name.clone();
            if name.as_str().is_empty() {
                return Err(ApiError::InvalidIndex("class with empty name".to_string()));
            }
            if index.insert(class).is_some() {
                return Err(ApiError::InvalidIndex(format!("duplicate class {name}")));
            }
        }
        Ok(index)
    }

    pub fn from_json_reader(reader: impl Read) -> ApiResult<Self> {
        let file: IndexFile = serde_json::from_reader(reader)?;
        Self::from_file(file)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> ApiResult<Self> {
        let file = File::open(path)?;
        Self::from_json_reader(BufReader::new(file))
    }

    pub fn to_file(&self) -> IndexFile {
        IndexFile {
            classes: self.classes.values().cloned().collect(),
        }
    }
}

impl IndexView for Index {
    fn class_by_name(&self, name: &DotName) -> Option<&ClassInfo> {
        self.classes.get(name)
    }

    fn known_classes(&self) -> Box<dyn Iterator<Item = &ClassInfo> + '_> {
        Box::new(self.classes.values())
    }

    fn len(&self) -> usize {
        self.classes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AnnotationInstance, AnnotationSite, FieldInfo, MethodParameterInfo, TypeRef,
    };

    const SAMPLE: &str = r#"{
        "classes": [
            {
                "name": "com.example.Pet",
                "kind": "class",
                "super_class": { "kind": "class", "name": "java.lang.Object" },
                "interfaces": [ { "kind": "class", "name": "java.io.Serializable" } ],
                "fields": [
                    {
                        "name": "age",
                        "type": { "kind": "primitive", "primitive": "int" },
                        "annotations": [
                            {
                                "name": "Schema",
                                "site": { "kind": "field" },
                                "values": [ { "name": "required", "value": { "kind": "boolean", "value": true } } ]
                            }
                        ]
                    }
                ]
            },
            { "name": "com.example.Dog", "super_class": { "kind": "class", "name": "com.example.Pet" } }
        ]
    }"#;

    #[test]
    fn test_load_from_json() {
        let index = Index::from_json_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(index.len(), 2);

        let pet = index.class_by_name(&DotName::new("com.example.Pet")).unwrap();
        assert_eq!(pet.interfaces, vec![TypeRef::class("java.io.Serializable")]);

        let age = pet.field("age").unwrap();
        assert_eq!(age.declaring_class, "com.example.Pet");
        assert_eq!(age.annotations[0].site, AnnotationSite::Field);

        let dog = index.class_by_name(&DotName::new("com.example.Dog")).unwrap();
        assert_eq!(dog.super_class, Some(TypeRef::class("com.example.Pet")));
        assert!(dog.fields.is_empty());
    }

    #[test]
    fn test_type_annotations_from_json() {
        let json = r#"{
            "classes": [{
                "name": "app.Order",
                "fields": [{
                    "name": "lines",
                    "type": { "kind": "class", "name": "java.util.List" },
                    "type_annotations": [ { "name": "NotEmpty", "site": { "kind": "field" } } ]
                }],
                "methods": [{
                    "name": "line",
                    "parameters": [ { "kind": "primitive", "primitive": "int" } ],
                    "type_annotations": [
                        { "name": "PositiveOrZero", "site": { "kind": "method_parameter", "position": 0 } }
                    ]
                }]
            }]
        }"#;
        let index = Index::from_json_reader(json.as_bytes()).unwrap();
        let order = index.class_by_name(&DotName::new("app.Order")).unwrap();

        let lines = order.field("lines").unwrap();
        assert!(lines.annotations.is_empty());
        assert_eq!(lines.annotated_type().annotations[0].name, "NotEmpty");

        let line = order.method("line").unwrap();
        let position = MethodParameterInfo::new(line, 0).annotated_type().unwrap();
        assert_eq!(position.annotations.len(), 1);
    }

    #[test]
    fn test_absent_means_not_indexed() {
        let index = Index::from_json_reader(SAMPLE.as_bytes()).unwrap();
        assert!(index.class_by_name(&DotName::new("java.lang.Object")).is_none());
    }

    #[test]
    fn test_duplicate_class_rejected() {
        let file = IndexFile {
            classes: vec![ClassInfo::new("a.A"), ClassInfo::new("a.A")],
        };
        assert!(matches!(
            Index::from_file(file),
            Err(ApiError::InvalidIndex(_))
        ));
    }

    #[test]
    fn test_insert_adopts_members() {
        let mut class = ClassInfo::new("a.B");
        class.fields.push(
            FieldInfo::new("x", TypeRef::class("java.lang.String"))
                .annotated(AnnotationInstance::new("a.Note", AnnotationSite::Field)),
        );
        let index = Index::new().with_class(class);
        let b = index.class_by_name(&DotName::new("a.B")).unwrap();
        assert_eq!(b.fields[0].declaring_class, "a.B");

        let round_trip = Index::from_file(index.to_file()).unwrap();
        assert_eq!(round_trip.len(), 1);
    }
}
