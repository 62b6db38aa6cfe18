use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Component, Path};

/// Separator used in every [`RelativeEntry`], regardless of the host platform.
pub const CANONICAL_SEPARATOR: &str = "/";

/// A file path expressed relative to its tree root.
///
/// Components are joined with [`CANONICAL_SEPARATOR`] and there is never a
/// leading separator, so the same file under two different roots (or on two
/// different platforms) yields the same key. The raw name bytes are kept:
/// names that are not valid UTF-8 stay distinct from one another. Ordering
/// is the lexicographic order of those bytes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelativeEntry(OsString);

impl RelativeEntry {
    /// Builds the entry for `path`, which must lie under `root`.
    ///
    /// Returns `None` when `path` is not inside `root` or names the root itself.
    pub fn from_paths(root: &Path, path: &Path) -> Option<Self> {
        let relative = path.strip_prefix(root).ok()?;
        Self::from_relative(relative)
    }

    /// Builds the entry from an already relative path.
    pub fn from_relative(relative: &Path) -> Option<Self> {
        let mut key = OsString::new();

        for component in relative.components() {
            match component {
                Component::Normal(name) => {
                    if !key.is_empty() {
                        key.push(CANONICAL_SEPARATOR);
                    }
                    key.push(name);
                }
                Component::CurDir => {}
                // A relative entry never escapes or re-anchors its root
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }

        if key.is_empty() { None } else { Some(Self(key)) }
    }

    pub fn as_os_str(&self) -> &OsStr {
        &self.0
    }

    /// Printable form; lossy for names that are not valid UTF-8.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        self.0.to_string_lossy()
    }
}

impl fmt::Display for RelativeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}
