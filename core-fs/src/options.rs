use serde::{Deserialize, Serialize};

use crate::encoding::ContentEncoding;

/// Options for `write_file` and `write_bytes`
///
/// Defaults: no creation, overwrite, UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WriteOptions {
    /// Create the file when it does not exist
    pub create: bool,
    /// Keep the existing content and add to the end
    pub append: bool,
    /// Text encoding; ignored by `write_bytes`
    pub encoding: ContentEncoding,
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(mut self, create: bool) -> Self {
        self.create = create;
        self
    }

    pub fn append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    pub fn encoding(mut self, encoding: ContentEncoding) -> Self {
        self.encoding = encoding;
        self
    }
}
