use core::fmt;
use std::str::FromStr;

use crate::storage::error::StorageError;

pub const OBJECT_SCHEME: &str = "sb://";

/// A private asset addressed by bucket and path, written as `sb://bucket/path`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub bucket: String,
    pub path: String,
}

impl ObjectRef {
    pub fn new(bucket: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            path: path.into(),
        }
    }

    pub fn is_object_ref(reference: &str) -> bool {
        reference.starts_with(OBJECT_SCHEME)
    }
}

impl FromStr for ObjectRef {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some(rest) = s.strip_prefix(OBJECT_SCHEME) else {
            return Err(StorageError::InvalidReference(s.to_string()));
        };

        match rest.split_once('/') {
            Some((bucket, path)) if !bucket.is_empty() && !path.is_empty() => {
                Ok(Self::new(bucket, path))
            }
            _ => Err(StorageError::InvalidReference(s.to_string())),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}/{}", OBJECT_SCHEME, self.bucket, self.path)
    }
}
