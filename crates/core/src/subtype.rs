//! Subtype test over the static index, falling back to the runtime type system.
//!
//! Index information always wins. The runtime is consulted only when the
//! subject is not indexed at all, or when its superclass chain leaves the
//! index before reaching an answer. Every unresolvable case answers `false`.

use crate::resolver::canonical_name;
use schemascope_api::{ClassInfo, DotName, IndexView, RuntimeTypes, TypeRef};
use std::collections::HashSet;
use tracing::{debug, trace};

/// How a walk of the subject's indexed hierarchy ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainOutcome {
    /// The target was found in the interface list or the superclass chain.
    Matched,
    /// The chain ended inside the index without meeting the target.
    Exhausted,
    /// The named superclass is not indexed; the index cannot answer.
    LeftIndex(DotName),
}

pub struct SubtypeTester<'a> {
    index: &'a dyn IndexView,
    runtime: &'a dyn RuntimeTypes,
}

impl<'a> SubtypeTester<'a> {
    pub fn new(index: &'a dyn IndexView, runtime: &'a dyn RuntimeTypes) -> Self {
        Self { index, runtime }
    }

    /// Whether `subject` is a `target`, e.g. whether `List` is a `Collection`.
    pub fn is_subtype(&self, subject: &TypeRef, target: &TypeRef) -> bool {
        let subject_name = canonical_name(subject);
        let target_name = canonical_name(target);

        let Some(subject_class) = self.index.class_by_name(&subject_name) else {
            debug!("{} is not indexed, asking the runtime", subject_name);
            return self.runtime_assignable(&subject_name, &target_name);
        };

        match self.walk_index(subject_class, &target_name) {
            ChainOutcome::Matched => true,
            ChainOutcome::Exhausted => false,
            ChainOutcome::LeftIndex(missing) => {
                debug!(
                    "superclass {} of {} is not indexed, asking the runtime",
                    missing, subject_name
                );
                self.runtime_assignable(&subject_name, &target_name)
            }
        }
    }

    /// Checks the subject's declared interfaces, then its superclass chain, one link at a time.
    ///
    /// Only the subject's own interfaces are considered; those of its superclasses are not.
    pub fn walk_index(&self, subject: &ClassInfo, target: &DotName) -> ChainOutcome {
        if subject
            .interfaces
            .iter()
            .any(|interface| canonical_name(interface) == *target)
        {
            return ChainOutcome::Matched;
        }

        let mut visited = HashSet::new();
        visited.insert(subject.name.clone());

        let mut super_type = subject.super_class.as_ref();
        while let Some(current) = super_type {
            let current_name = canonical_name(current);
            trace!("{} -> {}", subject.name, current_name);
            if current_name == *target {
                return ChainOutcome::Matched;
            }
            if !visited.insert(current_name.clone()) {
                debug!("cyclic superclass chain at {}", current_name);
                return ChainOutcome::Exhausted;
            }
            let Some(super_class) = self.index.class_by_name(&current_name) else {
                return ChainOutcome::LeftIndex(current_name);
            };
            super_type = super_class.super_class.as_ref();
        }

        ChainOutcome::Exhausted
    }

    /// Runtime answer for the whole test; `false` when either side fails to load.
    fn runtime_assignable(&self, subject: &DotName, target: &DotName) -> bool {
        let loaded = self
            .runtime
            .load(subject)
            .and_then(|subject| Ok((subject, self.runtime.load(target)?)));
        match loaded {
            Ok((subject, target)) => self.runtime.is_assignable_from(&target, &subject),
            Err(e) => {
                debug!("runtime cannot resolve {} <: {}: {}", subject, target, e);
                false
            }
        }
    }
}

/// Whether `subject` is a `target`, consulting `index` first and `runtime` as a fallback.
pub fn is_subtype(
    index: &dyn IndexView,
    runtime: &dyn RuntimeTypes,
    subject: &TypeRef,
    target: &TypeRef,
) -> bool {
    SubtypeTester::new(index, runtime).is_subtype(subject, target)
}
