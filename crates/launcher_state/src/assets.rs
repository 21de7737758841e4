use core_types::PathConverter;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters `encodeURIComponent` leaves alone.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Serves native files through the webview's asset protocol.
#[derive(Debug, Clone)]
pub struct AssetUrlConverter {
    base: String,
}

impl AssetUrlConverter {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// `http://asset.localhost/` on Windows, `asset://localhost/` elsewhere.
    pub fn for_current_platform() -> Self {
        if cfg!(windows) {
            Self::new("http://asset.localhost/")
        } else {
            Self::new("asset://localhost/")
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }
}

impl Default for AssetUrlConverter {
    fn default() -> Self {
        Self::for_current_platform()
    }
}

impl PathConverter for AssetUrlConverter {
    fn convert(&self, native_path: &str) -> String {
        format!(
            "{}{}",
            self.base,
            utf8_percent_encode(native_path, URI_COMPONENT)
        )
    }
}
