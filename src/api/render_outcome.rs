use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::MapError;

/// Result of one assembler render call.
///
/// Render entry points never return `Err`; a failure is reported here with
/// the error text, and no raster is attached.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderOutcome {
    success: bool,
    raster: Option<Vec<u8>>,
    error: Option<String>,
}

impl RenderOutcome {
    pub fn succeeded(raster: Option<Vec<u8>>) -> Self {
        Self {
            success: true,
            raster,
            error: None,
        }
    }

    pub fn failed(error: &MapError) -> Self {
        Self {
            success: false,
            raster: None,
            error: Some(error.to_string()),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success
    }

    #[must_use]
    pub fn raster(&self) -> Option<&[u8]> {
        self.raster.as_deref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Base64 of the raster, empty when there is none.
    #[must_use]
    pub fn to_base64(&self) -> String {
        self.raster
            .as_deref()
            .map(|bytes| STANDARD.encode(bytes))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn into_raster(self) -> Option<Vec<u8>> {
        self.raster
    }
}

#[cfg(test)]
mod tests {
    use super::RenderOutcome;
    use crate::error::MapError;

    #[test]
    fn failure_carries_text_and_no_raster() {
        let outcome = RenderOutcome::failed(&MapError::MissingData("central line".to_owned()));
        assert!(!outcome.is_success());
        assert_eq!(outcome.raster(), None);
        assert_eq!(outcome.to_base64(), "");
        assert!(outcome.error().is_some_and(|text| text.contains("central line")));
    }

    #[test]
    fn success_encodes_raster_as_base64() {
        let outcome = RenderOutcome::succeeded(Some(b"png".to_vec()));
        assert!(outcome.is_success());
        assert_eq!(outcome.to_base64(), "cG5n");
        assert_eq!(outcome.into_raster(), Some(b"png".to_vec()));
    }
}
