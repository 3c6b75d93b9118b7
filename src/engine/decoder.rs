// src/engine/decoder.rs
//
// Native vector backend: usvg parses, resvg rasterizes into a tiny-skia pixmap.
// Output is RGBA with premultiplied alpha, tightly packed.

use crate::engine::backend::RasterBackend;
use crate::engine::common::run_with_panic_policy;
use crate::engine::normalize::{AlphaMode, ChannelOrder, RawPixelBuffer};
use crate::engine::sizing::IntrinsicSize;
use crate::error::SvgDecodeError;
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg;

#[cfg(feature = "text")]
use resvg::usvg::fontdb;
#[cfg(feature = "text")]
use std::sync::{Arc, OnceLock};

type DecoderResult<T> = std::result::Result<T, SvgDecodeError>;

/// Element names that need a font database to render.
/// Prefixed forms cover `svg:text` and friends.
const TEXT_MARKERS: &[&[u8]] = &[
    b"<text",
    b":text",
    b"<tspan",
    b":tspan",
    b"<foreignObject",
    b":foreignObject",
    b"<altGlyph",
    b":altGlyph",
];

/// Which font database a parse gets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FontPolicy {
    /// System fonts only when the document appears to contain text
    #[default]
    Auto,
    /// Never load fonts; text renders as nothing
    Never,
    /// Always parse with system fonts
    Always,
}

impl FontPolicy {
    #[cfg_attr(not(feature = "text"), allow(dead_code))]
    fn wants_fonts(self, data: &[u8]) -> bool {
        match self {
            FontPolicy::Auto => svg_has_text(data),
            FontPolicy::Never => false,
            FontPolicy::Always => true,
        }
    }
}

/// Substring check for text-bearing elements. No XML parsing, so a marker in a
/// comment counts too; that only costs a font database load.
pub fn svg_has_text(data: &[u8]) -> bool {
    TEXT_MARKERS
        .iter()
        .any(|marker| data.windows(marker.len()).any(|w| w == *marker))
}

#[cfg(feature = "text")]
static FONTDB_WITH_FONTS: OnceLock<Arc<fontdb::Database>> = OnceLock::new();
#[cfg(feature = "text")]
static FONTDB_EMPTY: OnceLock<Arc<fontdb::Database>> = OnceLock::new();

#[cfg(feature = "text")]
fn empty_fontdb() -> Arc<fontdb::Database> {
    FONTDB_EMPTY
        .get_or_init(|| Arc::new(fontdb::Database::new()))
        .clone()
}

#[cfg(feature = "text")]
fn system_fontdb() -> Arc<fontdb::Database> {
    FONTDB_WITH_FONTS
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();

            #[cfg(target_os = "android")]
            {
                db.load_fonts_dir("/system/fonts");
                db.set_sans_serif_family("Roboto");
                db.set_serif_family("Noto Serif");
                db.set_monospace_family("Roboto Mono");
            }

            tracing::debug!(faces = db.len(), "loaded system font database");
            Arc::new(db)
        })
        .clone()
}

fn parse_options(data: &[u8], font_policy: FontPolicy) -> usvg::Options<'static> {
    #[allow(unused_mut)]
    let mut options = usvg::Options::default();
    #[cfg(feature = "text")]
    {
        options.fontdb = if font_policy.wants_fonts(data) {
            system_fontdb()
        } else {
            empty_fontdb()
        };
    }
    #[cfg(not(feature = "text"))]
    let _ = (data, font_policy);
    options
}

/// A parsed document ready to be rendered at any size.
pub struct ResvgDocument {
    tree: usvg::Tree,
}

impl ResvgDocument {
    pub fn parse(data: &[u8], font_policy: FontPolicy) -> DecoderResult<Self> {
        let options = parse_options(data, font_policy);
        let tree = usvg::Tree::from_data(data, &options)
            .map_err(|e| SvgDecodeError::parse_failed(format!("SVG parse failed: {e}")))?;
        Ok(Self { tree })
    }

    pub fn intrinsic_size(&self) -> IntrinsicSize {
        let size = self.tree.size();
        IntrinsicSize::new(size.width(), size.height())
    }

    /// Render scaled to exactly `width` x `height`. Both must be >= 1.
    pub fn render(&self, width: u32, height: u32) -> DecoderResult<RawPixelBuffer> {
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            SvgDecodeError::render_failed(width, height, "cannot allocate pixmap")
        })?;

        let size = self.tree.size();
        let transform = Transform::from_scale(
            width as f32 / size.width(),
            height as f32 / size.height(),
        );
        resvg::render(&self.tree, transform, &mut pixmap.as_mut());

        Ok(RawPixelBuffer::tight(
            width,
            height,
            ChannelOrder::Rgba,
            AlphaMode::Premultiplied,
            pixmap.take(),
        ))
    }
}

/// resvg/tiny-skia backend.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResvgBackend {
    font_policy: FontPolicy,
}

impl ResvgBackend {
    pub fn new(font_policy: FontPolicy) -> Self {
        Self { font_policy }
    }

    pub fn font_policy(&self) -> FontPolicy {
        self.font_policy
    }
}

impl RasterBackend for ResvgBackend {
    type Document = ResvgDocument;

    fn name(&self) -> &'static str {
        "resvg"
    }

    fn parse(&self, bytes: &[u8]) -> DecoderResult<ResvgDocument> {
        let font_policy = self.font_policy;
        run_with_panic_policy("parse:resvg", || ResvgDocument::parse(bytes, font_policy))
    }

    fn intrinsic_size(&self, document: &ResvgDocument) -> IntrinsicSize {
        document.intrinsic_size()
    }

    fn render(
        &self,
        document: &ResvgDocument,
        width: u32,
        height: u32,
    ) -> DecoderResult<RawPixelBuffer> {
        if width == 0 || height == 0 {
            return Err(SvgDecodeError::render_failed(
                width,
                height,
                "render size must be at least 1x1",
            ));
        }
        run_with_panic_policy("render:resvg", || document.render(width, height))
    }
}

/// Parse and render in one call. A 0 width or height means the SVG's own size
/// on that axis (rounded up).
pub fn render_svg(data: &[u8], width: u32, height: u32) -> DecoderResult<RawPixelBuffer> {
    let backend = ResvgBackend::default();
    let document = backend.parse(data)?;
    let intrinsic = document.intrinsic_size();

    let width = if width == 0 {
        (intrinsic.width.ceil() as u32).max(1)
    } else {
        width
    };
    let height = if height == 0 {
        (intrinsic.height.ceil() as u32).max(1)
    } else {
        height
    };
    backend.render(&document, width, height)
}
