// lib.rs
//
// lazy-svg: SVG decode core for image-loading pipelines
//
// Design goals:
// - One canonical bitmap layout no matter which renderer produced it
// - Render at the size the caller will display, not the size the file declares
// - Never decode what isn't ours (sniff first, report "not applicable")
// - Non-blocking async API with cooperative cancellation

pub mod engine;
pub mod error;
pub mod ops;

pub use engine::{
    CanonicalBitmap, DecodeOutcome, DecodeResult, DecoderConfig, SvgDecoder,
};
pub use error::{ErrorCategory, Result, SvgDecodeError};
pub use ops::{DecodeRequest, SizeConstraint};

/// Metrics payload version. Bump when fields change meaning.
pub const DECODE_METRICS_VERSION: &str = "1.0.0";

/// Per-decode timings and sizes.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodeMetrics {
    /// Schema version for compatibility negotiation
    pub version: String,
    /// Backend that rendered the image
    pub backend: String,
    /// Format sniffing, milliseconds
    pub sniff_ms: f64,
    /// Parsing the document and reading its intrinsic size, milliseconds
    pub parse_ms: f64,
    /// Rasterization, milliseconds
    pub render_ms: f64,
    /// Pixel normalization, milliseconds
    pub normalize_ms: f64,
    /// Wall clock for the whole decode, milliseconds
    pub total_ms: f64,
    /// Source document size in bytes
    pub bytes_in: u64,
    /// Intrinsic size the document declared (0 = unspecified)
    pub intrinsic_width: f32,
    pub intrinsic_height: f32,
    /// Resolved render size
    pub output_width: u32,
    pub output_height: u32,
}

impl Default for DecodeMetrics {
    fn default() -> Self {
        Self {
            version: DECODE_METRICS_VERSION.to_string(),
            backend: String::new(),
            sniff_ms: 0.0,
            parse_ms: 0.0,
            render_ms: 0.0,
            normalize_ms: 0.0,
            total_ms: 0.0,
            bytes_in: 0,
            intrinsic_width: 0.0,
            intrinsic_height: 0.0,
            output_width: 0,
            output_height: 0,
        }
    }
}

/// Get library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
