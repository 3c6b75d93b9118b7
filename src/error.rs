// src/error.rs
//
// Unified error handling for lazy-svg
// Uses thiserror for simple, type-safe error handling
//
// Error Taxonomy:
// - UserError: Invalid request or constraint, caller can fix it
// - CodecError: Malformed SVG content or backend render failure
// - ResourceLimit: Dimension/pixel/byte limits
// - InternalBug: Contract violations between backend and normalizer (should not happen)
//
// "Not an SVG" is not an error: the orchestrator reports DecodeOutcome::NotApplicable.

use std::borrow::Cow;
use thiserror::Error;

use crate::engine::RenderSize;

/// Error taxonomy used to decide what the host should do with a failed decode.
///
/// - UserError: Invalid input, recoverable by the caller
/// - CodecError: Format/render issues
/// - ResourceLimit: Memory/dimension limits
/// - InternalBug: Library bugs (should not happen)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCategory {
    /// Invalid input, recoverable by user
    UserError,
    /// Format/render issues
    CodecError,
    /// Memory/dimension limits
    ResourceLimit,
    /// Library bugs (should not happen)
    InternalBug,
}

impl ErrorCategory {
    /// Get string representation of error category
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::UserError => "UserError",
            ErrorCategory::CodecError => "CodecError",
            ErrorCategory::ResourceLimit => "ResourceLimit",
            ErrorCategory::InternalBug => "InternalBug",
        }
    }

    /// Get the LAZY_SVG_* error code string for this category
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCategory::UserError => "LAZY_SVG_USER_ERROR",
            ErrorCategory::CodecError => "LAZY_SVG_CODEC_ERROR",
            ErrorCategory::ResourceLimit => "LAZY_SVG_RESOURCE_LIMIT",
            ErrorCategory::InternalBug => "LAZY_SVG_INTERNAL_BUG",
        }
    }
}

/// lazy-svg error types
#[derive(Debug, Error)]
pub enum SvgDecodeError {
    // Backend Errors
    #[error("Failed to parse SVG: {message}")]
    ParseFailed { message: Cow<'static, str> },

    #[error("Render failed at {width}x{height}: {message}")]
    RenderFailed {
        width: u32,
        height: u32,
        message: Cow<'static, str>,
    },

    // Normalizer Errors
    #[error(
        "Pixel buffer too small for {width}x{height} (bytes_per_row={bytes_per_row}): expected at least {expected} bytes, got {actual}"
    )]
    BufferTooSmall {
        width: u32,
        height: u32,
        bytes_per_row: usize,
        expected: usize,
        actual: usize,
    },

    // Request Errors
    #[error("Invalid size constraint: {reason}")]
    InvalidConstraint { reason: Cow<'static, str> },

    #[error("Invalid value for {name}: {value}. {reason}")]
    InvalidArgument {
        name: Cow<'static, str>,
        value: Cow<'static, str>,
        reason: Cow<'static, str>,
    },

    // Size Limit Errors
    #[error("Render dimension {dimension} exceeds maximum {max}")]
    DimensionExceedsLimit { dimension: u32, max: u32 },

    #[error("Render pixel count {pixels} exceeds maximum {max}")]
    PixelCountExceedsLimit { pixels: u64, max: u64 },

    #[error("Firewall blocked the decode: {reason}")]
    FirewallViolation { reason: Cow<'static, str> },

    // Lifecycle Errors
    #[error("Decode cancelled before {stage}")]
    Cancelled { stage: &'static str },

    // Internal Errors
    #[error("Internal error: {message}")]
    InternalPanic { message: Cow<'static, str> },

    // Stage context added by the orchestrator
    #[error("{stage} failed{}: {source}", fmt_render_size(.render_size))]
    Stage {
        stage: &'static str,
        render_size: Option<RenderSize>,
        #[source]
        source: Box<SvgDecodeError>,
    },
}

fn fmt_render_size(size: &Option<RenderSize>) -> String {
    match size {
        Some(size) => format!(" (render size {}x{})", size.width, size.height),
        None => String::new(),
    }
}

impl Clone for SvgDecodeError {
    fn clone(&self) -> Self {
        match self {
            Self::ParseFailed { message } => Self::ParseFailed {
                message: message.clone(),
            },
            Self::RenderFailed {
                width,
                height,
                message,
            } => Self::RenderFailed {
                width: *width,
                height: *height,
                message: message.clone(),
            },
            Self::BufferTooSmall {
                width,
                height,
                bytes_per_row,
                expected,
                actual,
            } => Self::BufferTooSmall {
                width: *width,
                height: *height,
                bytes_per_row: *bytes_per_row,
                expected: *expected,
                actual: *actual,
            },
            Self::InvalidConstraint { reason } => Self::InvalidConstraint {
                reason: reason.clone(),
            },
            Self::InvalidArgument {
                name,
                value,
                reason,
            } => Self::InvalidArgument {
                name: name.clone(),
                value: value.clone(),
                reason: reason.clone(),
            },
            Self::DimensionExceedsLimit { dimension, max } => Self::DimensionExceedsLimit {
                dimension: *dimension,
                max: *max,
            },
            Self::PixelCountExceedsLimit { pixels, max } => Self::PixelCountExceedsLimit {
                pixels: *pixels,
                max: *max,
            },
            Self::FirewallViolation { reason } => Self::FirewallViolation {
                reason: reason.clone(),
            },
            Self::Cancelled { stage } => Self::Cancelled { stage: *stage },
            Self::InternalPanic { message } => Self::InternalPanic {
                message: message.clone(),
            },
            Self::Stage {
                stage,
                render_size,
                source,
            } => Self::Stage {
                stage: *stage,
                render_size: *render_size,
                source: source.clone(),
            },
        }
    }
}

// Constructor Helpers
impl SvgDecodeError {
    pub fn parse_failed(message: impl Into<Cow<'static, str>>) -> Self {
        Self::ParseFailed {
            message: message.into(),
        }
    }

    pub fn render_failed(width: u32, height: u32, message: impl Into<Cow<'static, str>>) -> Self {
        Self::RenderFailed {
            width,
            height,
            message: message.into(),
        }
    }

    pub fn buffer_too_small(
        dims: (u32, u32),
        bytes_per_row: usize,
        expected: usize,
        actual: usize,
    ) -> Self {
        Self::BufferTooSmall {
            width: dims.0,
            height: dims.1,
            bytes_per_row,
            expected,
            actual,
        }
    }

    pub fn invalid_constraint(reason: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidConstraint {
            reason: reason.into(),
        }
    }

    pub fn invalid_argument(
        name: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
        reason: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn dimension_exceeds_limit(dimension: u32, max: u32) -> Self {
        Self::DimensionExceedsLimit { dimension, max }
    }

    pub fn pixel_count_exceeds_limit(pixels: u64, max: u64) -> Self {
        Self::PixelCountExceedsLimit { pixels, max }
    }

    pub fn firewall_violation(reason: impl Into<Cow<'static, str>>) -> Self {
        Self::FirewallViolation {
            reason: reason.into(),
        }
    }

    pub fn cancelled(stage: &'static str) -> Self {
        Self::Cancelled { stage }
    }

    pub fn internal_panic(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InternalPanic {
            message: message.into(),
        }
    }

    /// Attach the pipeline stage (and the render size requested so far) to an error.
    /// Already-staged errors are returned unchanged so the innermost stage wins.
    pub fn at_stage(self, stage: &'static str, render_size: Option<RenderSize>) -> Self {
        match self {
            staged @ Self::Stage { .. } => staged,
            other => Self::Stage {
                stage,
                render_size,
                source: Box::new(other),
            },
        }
    }

    /// The error without any stage context.
    pub fn root(&self) -> &SvgDecodeError {
        match self {
            Self::Stage { source, .. } => source.root(),
            other => other,
        }
    }

    /// Stage name, if the orchestrator attached one.
    pub fn stage(&self) -> Option<&'static str> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.root(), Self::Cancelled { .. })
    }

    /// Check if this error is recoverable (user can fix it)
    ///
    /// Consistent with category():
    /// - UserError and ResourceLimit are recoverable (different request or size)
    /// - CodecError and InternalBug are not
    pub fn is_recoverable(&self) -> bool {
        match self.category() {
            ErrorCategory::UserError | ErrorCategory::ResourceLimit => true,
            ErrorCategory::CodecError | ErrorCategory::InternalBug => false,
        }
    }

    /// Get the error category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidConstraint { .. }
            | Self::InvalidArgument { .. }
            | Self::Cancelled { .. } => ErrorCategory::UserError,

            Self::ParseFailed { .. } | Self::RenderFailed { .. } => ErrorCategory::CodecError,

            Self::DimensionExceedsLimit { .. }
            | Self::PixelCountExceedsLimit { .. }
            | Self::FirewallViolation { .. } => ErrorCategory::ResourceLimit,

            Self::BufferTooSmall { .. } | Self::InternalPanic { .. } => ErrorCategory::InternalBug,

            Self::Stage { source, .. } => source.category(),
        }
    }
}

// Result type alias
pub type Result<T> = std::result::Result<T, SvgDecodeError>;
