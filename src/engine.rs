// src/engine.rs
//
// The core of lazy-svg. A decode pipeline that:
// 1. Sniffs the input (SVG or not applicable)
// 2. Resolves the render size from intrinsic size + request constraints
// 3. Rasterizes through a pluggable backend
// 4. Normalizes the backend's pixels into one canonical bitmap
//
// This file is a facade that re-exports the decomposed modules in engine/

// =============================================================================
// SIZE LIMITS
// =============================================================================

/// Maximum allowed render dimension (width or height).
/// Renders larger than 32768x32768 are rejected before a pixmap is allocated.
pub const MAX_DIMENSION: u32 = 32768;

/// Maximum allowed total pixels (width * height).
/// 100 megapixels = 400MB RGBA. Beyond this is likely a hostile viewBox.
pub const MAX_PIXELS: u64 = 100_000_000;

/// Edge length used for an axis the SVG leaves unspecified.
pub const SVG_DEFAULT_SIZE: u32 = 512;

/// Default clamp for both output edges (host max bitmap size).
pub const DEFAULT_MAX_DIMENSION: u32 = 4096;

// =============================================================================
// MODULE DECOMPOSITION
// =============================================================================

mod api;
mod backend;
mod bridge;
mod common;
mod decoder;
mod firewall;
mod normalize;
mod pool;
mod sizing;
mod sniff;
mod tasks;
mod tracker;

pub use api::{DecodeFuture, DecoderConfig, SvgDecoder};
pub use backend::{BackendKind, RasterBackend};
pub use bridge::{CallbackBridge, CancelToken};
pub use common::run_with_panic_policy;
pub use decoder::{render_svg, svg_has_text, FontPolicy, ResvgBackend, ResvgDocument};
pub use firewall::{FirewallConfig, FirewallPolicy};
pub use normalize::{normalize, AlphaMode, CanonicalBitmap, ChannelOrder, RawPixelBuffer};
pub use pool::get_pool;
pub use sizing::{
    check_dimensions, compute_dst_size, compute_size_multiplier, resolve, IntrinsicSize,
    RenderSize,
};
pub use sniff::{is_svg, MIME_TYPE_SVG, MIME_TYPE_XML, SVG_DETECT_BUFFER_SIZE};
pub use tasks::{DecodeOutcome, DecodeResult, DecodeState, DecodeTask};
pub use tracker::{DecodeRecorder, PerformanceTracker, TrackerStats};
