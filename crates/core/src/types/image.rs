//! Self-contained image payloads.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A self-contained encoded image, stored inline as a `data:` URL.
///
/// The catalog store holds no binary blobs; every product image is a
/// base64 data URL produced by the admin ingestion pipeline and rendered
/// directly into `src` attributes on both sites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageData(String);

impl ImageData {
    /// Wrap an encoded data URL.
    #[must_use]
    pub fn new(data_url: impl Into<String>) -> Self {
        Self(data_url.into())
    }

    /// The data URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Byte length of the encoded payload, used for store-size logging.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ImageData {
    fn from(data_url: String) -> Self {
        Self(data_url)
    }
}
