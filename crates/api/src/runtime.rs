//! The runtime type system, consulted when the static index has no answer.

use crate::error::{ApiError, ApiResult};
use crate::models::DotName;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

/// A class as seen by the runtime (i.e. loaded, not merely indexed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeType {
    pub name: DotName,
    pub is_interface: bool,
    pub super_class: Option<DotName>,
    pub interfaces: Vec<DotName>,
}

impl RuntimeType {
    pub fn class(name: impl Into<DotName>, super_class: Option<&str>) -> Self {
        Self {
            name: name.into(),
            is_interface: false,
            super_class: super_class.map(DotName::new),
            interfaces: Vec::new(),
        }
    }

    pub fn interface(name: impl Into<DotName>) -> Self {
        Self {
            name: name.into(),
            is_interface: true,
            super_class: Some(DotName::OBJECT),
            interfaces: Vec::new(),
        }
    }

    pub fn implementing(mut self, interface: &str) -> Self {
        self.interfaces.push(DotName::new(interface));
        self
    }

    /// Direct supertypes: the superclass first, then interfaces in declaration order.
    pub fn supertypes(&self) -> impl Iterator<Item = &DotName> {
        self.super_class.iter().chain(self.interfaces.iter())
    }
}

/// Loads classes by name and answers assignability between them.
pub trait RuntimeTypes: Send + Sync {
    /// Load a class by canonical name.
    ///
    /// Fails with [`ApiError::ClassNotFound`] when the class is not loadable.
    fn load(&self, name: &DotName) -> ApiResult<Arc<RuntimeType>>;

    /// Whether a value of `subject` can be assigned to `target`.
    ///
    /// Default implementation walks the supertypes of `subject` breadth first.
    /// Ancestors that fail to load are skipped.
    fn is_assignable_from(&self, target: &RuntimeType, subject: &RuntimeType) -> bool {
        if target.name == subject.name || target.name == DotName::OBJECT {
            return true;
        }

        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(subject.name.clone());
        for parent in subject.supertypes() {
            if visited.insert(parent.clone()) {
                queue.push_back(parent.clone());
            }
        }

        while let Some(current) = queue.pop_front() {
            if current == target.name {
                return true;
            }

            let Ok(loaded) = self.load(&current) else {
                tracing::trace!("skipping unloadable ancestor {}", current);
                continue;
            };
            for parent in loaded.supertypes() {
                if visited.insert(parent.clone()) {
                    queue.push_back(parent.clone());
                }
            }
        }

        false
    }
}

/// A runtime in which nothing is loadable.
pub struct NoRuntimeTypes;

impl RuntimeTypes for NoRuntimeTypes {
    fn load(&self, name: &DotName) -> ApiResult<Arc<RuntimeType>> {
        Err(ApiError::ClassNotFound(name.to_string()))
    }
}

/// A fixed, in-memory set of loadable classes.
#[derive(Debug, Default)]
pub struct RuntimeTypeTable {
    types: HashMap<DotName, Arc<RuntimeType>>,
}

impl RuntimeTypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, ty: RuntimeType) -> Self {
        self.types.insert(ty.name.clone(), Arc::new(ty));
        self
    }

    pub fn with_class(self, name: &str, super_class: Option<&str>) -> Self {
        self.with_type(RuntimeType::class(name, super_class))
    }

    pub fn with_interface(self, name: &str, super_interfaces: &[&str]) -> Self {
        let ty = super_interfaces
            .iter()
            .fold(RuntimeType::interface(name), |ty, parent| ty.implementing(parent));
        self.with_type(ty)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl RuntimeTypes for RuntimeTypeTable {
    fn load(&self, name: &DotName) -> ApiResult<Arc<RuntimeType>> {
        self.types
            .get(name)
            .cloned()
            .ok_or_else(|| ApiError::ClassNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collections() -> RuntimeTypeTable {
        RuntimeTypeTable::new()
            .with_class("java.lang.Object", None)
            .with_interface("java.lang.Iterable", &[])
            .with_interface("java.util.Collection", &["java.lang.Iterable"])
            .with_interface("java.util.List", &["java.util.Collection"])
            .with_type(
                RuntimeType::class("java.util.AbstractList", Some("java.lang.Object"))
                    .implementing("java.util.List"),
            )
            .with_class("java.util.ArrayList", Some("java.util.AbstractList"))
    }

    fn assignable(rt: &dyn RuntimeTypes, target: &str, subject: &str) -> bool {
        let target = rt.load(&DotName::new(target)).unwrap();
        let subject = rt.load(&DotName::new(subject)).unwrap();
        rt.is_assignable_from(&target, &subject)
    }

    #[test]
    fn test_assignable_through_superclass_and_interfaces() {
        let rt = collections();
        assert!(assignable(&rt, "java.util.Collection", "java.util.ArrayList"));
        assert!(assignable(&rt, "java.lang.Iterable", "java.util.List"));
        assert!(assignable(&rt, "java.util.List", "java.util.List"));
        assert!(assignable(&rt, "java.lang.Object", "java.util.Collection"));
        assert!(!assignable(&rt, "java.util.ArrayList", "java.util.Collection"));
        assert!(!assignable(&rt, "java.util.List", "java.lang.Object"));
    }

    #[test]
    fn test_unloadable_ancestor_is_skipped() {
        let rt = RuntimeTypeTable::new()
            .with_class("a.Child", Some("a.Missing"))
            .with_interface("a.Marker", &[]);
        assert!(!assignable(&rt, "a.Marker", "a.Child"));
    }

    #[test]
    fn test_no_runtime_loads_nothing() {
        assert!(matches!(
            NoRuntimeTypes.load(&DotName::OBJECT),
            Err(ApiError::ClassNotFound(_))
        ));
    }
}
