use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::borrow::Borrow;
use std::fmt;

/// Fully qualified, dot separated type name (e.g. `java.util.List`, `int`).
///
/// This is the lookup key for both the static index and the runtime type system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DotName(SmolStr);

impl DotName {
    pub const OBJECT: DotName = DotName::from_static("java.lang.Object");

    pub const fn from_static(name: &'static str) -> Self {
        Self(SmolStr::new_static(name))
    }

    pub fn new(name: impl AsRef<str>) -> Self {
        Self(SmolStr::new(name.as_ref()))
    }

    /// Converts an internal binary name (`java/util/Map$Entry`) to a dotted one.
    pub fn from_internal(internal: &str) -> Self {
        Self::new(internal.replace('/', "."))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Simple name without the package prefix.
    pub fn local(&self) -> &str {
        match self.0.rfind('.') {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }

    pub fn package(&self) -> Option<&str> {
        self.0.rfind('.').map(|idx| &self.0[..idx])
    }

    /// Internal form used inside class files and archives (`java/lang/String`).
    pub fn to_internal(&self) -> String {
        self.0.replace('.', "/")
    }
}

impl fmt::Display for DotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DotName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for DotName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DotName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DotName {
    fn from(value: String) -> Self {
        Self(SmolStr::from(value))
    }
}

impl PartialEq<str> for DotName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for DotName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
