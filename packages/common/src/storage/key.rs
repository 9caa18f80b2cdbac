use std::fmt;
use std::path::{Path, PathBuf};

use rand::Rng;
use rand::distr::Alphanumeric;

use super::error::StorageError;

const MAX_KEY_LEN: usize = 512;

/// Length of the random tiebreak appended when a name is already taken.
const SUFFIX_LEN: usize = 7;

/// A validated, relative, `/`-separated blob location such as
/// `photos/2024/05/01/cam7_20240501_101500.jpg`.
///
/// Keys never escape the store root: they cannot be absolute, contain `..`
/// or hidden segments, or use characters outside `[A-Za-z0-9/_.-]`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BlobKey(String);

impl BlobKey {
    /// Parse and validate a key.
    pub fn parse(s: &str) -> Result<Self, StorageError> {
        let invalid = |msg: &str| Err(StorageError::InvalidKey(msg.to_string()));

        if s.is_empty() {
            return invalid("key cannot be empty");
        }
        if s.len() > MAX_KEY_LEN {
            return invalid("key exceeds maximum length of 512 characters");
        }
        if s.contains('\0') {
            return invalid("key must not contain null bytes");
        }
        if s.contains('\\') {
            return invalid("key must not contain backslashes");
        }
        if s.starts_with('/') || s.ends_with('/') {
            return invalid("key must not start or end with '/'");
        }
        for segment in s.split('/') {
            if segment.is_empty() {
                return invalid("key must not contain empty segments");
            }
            // Also covers `..` traversal.
            if segment.starts_with('.') {
                return invalid("key segments must not start with '.'");
            }
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_' | '.'))
        {
            return invalid("key contains invalid characters (allowed: a-zA-Z0-9, /, -, _, .)");
        }

        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last path segment.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Resolve the key below a filesystem root.
    pub fn to_path(&self, root: &Path) -> PathBuf {
        self.0
            .split('/')
            .fold(root.to_path_buf(), |path, segment| path.join(segment))
    }
}

impl fmt::Debug for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlobKey({})", self.0)
    }
}

impl fmt::Display for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BlobKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A suggested blob name: `{dir}/{stem}.{ext}`.
///
/// The store resolves it to a concrete [`BlobKey`] via [`BlobName::candidate`],
/// falling back to randomised variants when the plain name is taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobName {
    dir: String,
    stem: String,
    ext: String,
}

impl BlobName {
    pub fn new(dir: impl Into<String>, stem: impl Into<String>, ext: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            stem: stem.into(),
            ext: ext.into(),
        }
    }

    /// Key for the given attempt. Attempt 0 is the plain name; later attempts
    /// append `_` and a random alphanumeric token to the stem.
    pub fn candidate(&self, attempt: usize) -> Result<BlobKey, StorageError> {
        let stem = if attempt == 0 {
            self.stem.clone()
        } else {
            let token: String = rand::rng()
                .sample_iter(&Alphanumeric)
                .take(SUFFIX_LEN)
                .map(char::from)
                .collect();
            format!("{}_{token}", self.stem)
        };

        let file_name = if self.ext.is_empty() {
            stem
        } else {
            format!("{stem}.{}", self.ext)
        };

        if self.dir.is_empty() {
            BlobKey::parse(&file_name)
        } else {
            BlobKey::parse(&format!("{}/{file_name}", self.dir))
        }
    }
}

impl fmt::Display for BlobName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.dir.is_empty() {
            write!(f, "{}/", self.dir)?;
        }
        f.write_str(&self.stem)?;
        if !self.ext.is_empty() {
            write!(f, ".{}", self.ext)?;
        }
        Ok(())
    }
}
