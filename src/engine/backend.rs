// src/engine/backend.rs
//
// Rasterization backend seam. One implementation per renderer, chosen by
// configuration (BackendKind) rather than discovered at runtime.

use crate::engine::normalize::RawPixelBuffer;
use crate::engine::sizing::IntrinsicSize;
use crate::error::SvgDecodeError;

type BackendResult<T> = std::result::Result<T, SvgDecodeError>;

/// A renderer that turns SVG bytes into raw pixels.
///
/// Contract:
/// - `parse` fails with `SvgDecodeError::ParseFailed` on malformed content
/// - `render` is only called with width/height >= 1 and fails with
///   `SvgDecodeError::RenderFailed` when the backend cannot produce that size
/// - the returned buffer declares its true channel order and alpha convention
pub trait RasterBackend: Send + Sync {
    /// Parsed document, owned by one decode.
    type Document: Send;

    /// Short name used in logs and metrics keys.
    fn name(&self) -> &'static str;

    fn parse(&self, bytes: &[u8]) -> BackendResult<Self::Document>;

    fn intrinsic_size(&self, document: &Self::Document) -> IntrinsicSize;

    fn render(
        &self,
        document: &Self::Document,
        width: u32,
        height: u32,
    ) -> BackendResult<RawPixelBuffer>;
}

/// Which backend a decoder is configured with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// Native vector renderer (resvg + tiny-skia)
    #[default]
    Resvg,
}

impl BackendKind {
    pub fn from_str(value: &str) -> Result<Self, String> {
        match value.to_lowercase().as_str() {
            "resvg" | "native" => Ok(Self::Resvg),
            other => Err(format!("unsupported svg backend: {other}")),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Resvg => "resvg",
        }
    }
}
