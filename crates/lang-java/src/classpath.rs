//! A runtime type system that loads classes from a JVM classpath without a JVM.
//!
//! Entries are searched in order, like a class loader would. Loaded classes and
//! misses are cached for the lifetime of the [`ClasspathTypes`].

use crate::classfile::read_runtime_type;
use crate::error::{ClasspathError, Result};
use dashmap::DashMap;
use ristretto_jimage::Image;
use schemascope_api::{ApiError, ApiResult, DotName, PrimitiveKind, RuntimeType, RuntimeTypes};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace, warn};
use zip::ZipArchive;

/// Kind of a classpath element, detected from the file system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClasspathEntry {
    /// Exploded classes, `a/b/C.class` under the root.
    Directory(PathBuf),
    /// A `.jar` or `.zip` archive.
    Archive(PathBuf),
    /// A JDK runtime image (`lib/modules`).
    Image(PathBuf),
}

impl ClasspathEntry {
    /// Detects the entry kind from magic bytes.
    pub fn detect(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let io_err = |source| ClasspathError::Io {
            path: path.to_path_buf(),
            source,
        };

        if path.is_dir() {
            return Ok(ClasspathEntry::Directory(path.to_path_buf()));
        }

        let mut file = File::open(path).map_err(io_err)?;
        let mut magic = [0u8; 4];
        file.read_exact(&mut magic).map_err(io_err)?;

        match &magic {
            // ZIP: PK\x03\x04, PK\x05\x06 (empty) or PK\x07\x08 (spanned)
            [0x50, 0x4B, _, _] => Ok(ClasspathEntry::Archive(path.to_path_buf())),
            // JImage: CAFEDADA (big-endian) or DADAFECA (little-endian)
            [0xCA, 0xFE, 0xDA, 0xDA] | [0xDA, 0xDA, 0xFE, 0xCA] => {
                Ok(ClasspathEntry::Image(path.to_path_buf()))
            }
            _ => Err(ClasspathError::Unsupported(path.to_path_buf())),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ClasspathEntry::Directory(p) | ClasspathEntry::Archive(p) | ClasspathEntry::Image(p) => p,
        }
    }
}

enum Source {
    Directory(PathBuf),
    Archive(Mutex<ZipArchive<File>>),
    Image(Mutex<Image>),
}

struct OpenEntry {
    entry: ClasspathEntry,
    source: Source,
}

impl OpenEntry {
    fn open(entry: ClasspathEntry) -> Result<Self> {
        let source = match &entry {
            ClasspathEntry::Directory(root) => Source::Directory(root.clone()),
            ClasspathEntry::Archive(path) => {
                let file = File::open(path).map_err(|source| ClasspathError::Io {
                    path: path.clone(),
                    source,
                })?;
                let archive = ZipArchive::new(file).map_err(|e| ClasspathError::Archive {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
                Source::Archive(Mutex::new(archive))
            }
            ClasspathEntry::Image(path) => {
                let image = Image::from_file(path).map_err(|e| ClasspathError::Archive {
                    path: path.clone(),
                    message: format!("{e:?}"),
                })?;
                Source::Image(Mutex::new(image))
            }
        };
        Ok(Self { entry, source })
    }

    /// Raw bytes of `class_path` (`java/lang/String.class`), if this entry has it.
    fn read(&self, class_path: &str) -> Option<Vec<u8>> {
        match &self.source {
            Source::Directory(root) => std::fs::read(root.join(class_path)).ok(),
            Source::Archive(archive) => {
                let mut archive = lock(archive, self.entry.path());
                let mut entry = archive.by_name(class_path).ok()?;
                let mut bytes = Vec::new();
                entry.read_to_end(&mut bytes).ok()?;
                Some(bytes)
            }
            Source::Image(image) => {
                let image = lock(image, self.entry.path());
                // Resource names carry the module, e.g. /java.base/java/lang/String.class
                let suffix = format!("/{class_path}");
                for resource in image.iter().flatten() {
                    let name = resource.name();
                    if name == class_path || name.ends_with(&suffix) {
                        return Some(resource.data().to_vec());
                    }
                }
                None
            }
        }
    }
}

/// Locks a reader, taking it back if another thread panicked while holding it.
fn lock<'a, T>(mutex: &'a Mutex<T>, path: &Path) -> MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|poisoned: PoisonError<MutexGuard<'a, T>>| {
        warn!("recovering poisoned reader for {}", path.display());
        poisoned.into_inner()
    })
}

/// Loads classes from class files on a classpath.
pub struct ClasspathTypes {
    entries: Vec<OpenEntry>,
    cache: DashMap<DotName, Option<Arc<RuntimeType>>>,
}

impl ClasspathTypes {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            cache: DashMap::new(),
        }
    }

    /// Opens the given paths, in search order.
    pub fn open<I, P>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut types = Self::new();
        for path in paths {
            types.add_path(path)?;
        }
        Ok(types)
    }

    /// Appends a path to the end of the search order.
    pub fn add_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let entry = ClasspathEntry::detect(path)?;
        debug!("classpath entry {:?}", entry);
        self.entries.push(OpenEntry::open(entry)?);
        self.cache.clear();
        Ok(())
    }

    pub fn entries(&self) -> impl Iterator<Item = &ClasspathEntry> {
        self.entries.iter().map(|open| &open.entry)
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    fn locate(&self, name: &DotName) -> Option<Vec<u8>> {
        let candidates = class_paths(name);
        for open in &self.entries {
            for candidate in &candidates {
                if let Some(bytes) = open.read(candidate) {
                    trace!("{} found in {}", name, open.entry.path().display());
                    return Some(bytes);
                }
            }
        }
        None
    }

    fn load_uncached(&self, name: &DotName) -> Option<Arc<RuntimeType>> {
        // Primitive types have no class file and cannot be loaded by name.
        if PrimitiveKind::from_keyword(name.as_str()).is_some() {
            return None;
        }
        let bytes = self.locate(name)?;
        match read_runtime_type(name, bytes) {
            Ok(ty) => Some(Arc::new(ty)),
            Err(e) => {
                debug!("{}", e);
                None
            }
        }
    }
}

impl Default for ClasspathTypes {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeTypes for ClasspathTypes {
    fn load(&self, name: &DotName) -> ApiResult<Arc<RuntimeType>> {
        let cached = self.cache.get(name).map(|hit| hit.value().clone());
        let loaded = match cached {
            Some(loaded) => loaded,
            None => {
                let loaded = self.load_uncached(name);
                self.cache.insert(name.clone(), loaded.clone());
                loaded
            }
        };
        loaded.ok_or_else(|| ApiError::ClassNotFound(name.to_string()))
    }
}

/// Archive paths to try for `name`: the plain binary name, then every way of
/// reading trailing segments as nested classes, innermost first
/// (`a.Outer.Mid.Inner` -> `a/Outer/Mid$Inner.class`, `a/Outer$Mid$Inner.class`, ...).
fn class_paths(name: &DotName) -> Vec<String> {
    let internal = name.to_internal();
    let mut paths = vec![format!("{internal}.class")];
    let mut nested = internal;
    while let Some(idx) = nested.rfind('/') {
        nested.replace_range(idx..idx + 1, "$");
        paths.push(format!("{nested}.class"));
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_paths_include_nested_spelling() {
        assert_eq!(
            class_paths(&DotName::new("java.util.Map.Entry")),
            vec![
                "java/util/Map/Entry.class".to_string(),
                "java/util/Map$Entry.class".to_string()
            ]
        );
        assert_eq!(class_paths(&DotName::new("Top")), vec!["Top.class".to_string()]);
    }

    #[test]
    fn test_class_paths_cover_every_nesting_depth() {
        assert_eq!(
            class_paths(&DotName::new("a.Outer.Mid.Inner")),
            vec![
                "a/Outer/Mid/Inner.class".to_string(),
                "a/Outer/Mid$Inner.class".to_string(),
                "a/Outer$Mid$Inner.class".to_string(),
                "a$Outer$Mid$Inner.class".to_string(),
            ]
        );
    }

    /// `java.lang.Object`: constant pool of one Utf8 and one Class entry, no supertypes.
    fn object_class_bytes() -> Vec<u8> {
        let name = b"java/lang/Object";
        let mut bytes = vec![0xCA, 0xFE, 0xBA, 0xBE, 0, 0, 0, 52, 0, 3, 1];
        bytes.extend_from_slice(&(name.len() as u16).to_be_bytes());
        bytes.extend_from_slice(name);
        // Class #2 -> #1, ACC_PUBLIC | ACC_SUPER, this #2, super 0
        bytes.extend_from_slice(&[7, 0, 1, 0, 0x21, 0, 2, 0, 0]);
        // interfaces, fields, methods, attributes
        bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0]);
        bytes
    }

    #[test]
    fn test_poisoned_archive_still_reads() {
        use std::io::Write;
        use zip::write::SimpleFileOptions;

        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("rt.jar");
        let mut zip = zip::ZipWriter::new(File::create(&jar).unwrap());
        zip.start_file("java/lang/Object.class", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(&object_class_bytes()).unwrap();
        zip.finish().unwrap();

        let types = ClasspathTypes::open([&jar]).unwrap();
        let Source::Archive(archive) = &types.entries[0].source else {
            panic!("expected an archive entry");
        };
        std::thread::scope(|scope| {
            let holder = scope.spawn(|| {
                let _guard = archive.lock().unwrap();
                panic!("reader panicked while holding the archive");
            });
            assert!(holder.join().is_err());
        });
        assert!(archive.is_poisoned());

        let object = types.load(&DotName::OBJECT).unwrap();
        assert_eq!(object.super_class, None);
    }

    #[test]
    fn test_primitives_are_not_loadable() {
        let types = ClasspathTypes::new();
        assert!(types.load(&DotName::new("int")).is_err());
    }

    #[test]
    fn test_misses_are_cached() {
        let types = ClasspathTypes::new();
        assert!(types.load(&DotName::new("a.Missing")).is_err());
        assert_eq!(types.cached(), 1);
    }
}
