// tests/edge_cases.rs
//
// Edge case tests for lazy-svg
// Tests boundary values, invalid inputs, and error handling

use lazy_svg::engine::{
    check_dimensions, normalize, resolve, AlphaMode, ChannelOrder, DecodeOutcome, DecoderConfig,
    FirewallConfig, FontPolicy, IntrinsicSize, RawPixelBuffer, SvgDecoder, MAX_DIMENSION,
    MAX_PIXELS,
};
use lazy_svg::error::{ErrorCategory, SvgDecodeError};
use lazy_svg::ops::{DecodeRequest, Scale, SizeConstraint};

// Helper to build a solid-color SVG with explicit intrinsic size
fn solid_svg(width: u32, height: u32) -> Vec<u8> {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}"><rect width="100%" height="100%" fill="#336699"/></svg>"##
    )
    .into_bytes()
}

mod size_edge_cases {
    use super::*;

    #[test]
    fn test_one_by_one_render() {
        let decoder = SvgDecoder::default();
        let result = decoder
            .decode(solid_svg(1, 1), DecodeRequest::default())
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(result.bitmap.dimensions(), (1, 1));
        assert_eq!(result.bitmap.bytes().len(), 4);
    }

    #[test]
    fn test_zero_target_floors_to_one_pixel() {
        let decoder = SvgDecoder::default();
        let request = DecodeRequest::new(SizeConstraint::exact(0, 0, Scale::Fit));
        let result = decoder
            .decode(solid_svg(64, 32), request)
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(result.bitmap.dimensions(), (1, 1));
    }

    #[test]
    fn test_extreme_aspect_ratio_keeps_short_edge() {
        let decoder = SvgDecoder::default();
        let request = DecodeRequest::new(SizeConstraint::thumbnail());
        let result = decoder
            .decode(solid_svg(3000, 2), request)
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(result.bitmap.dimensions(), (150, 1));
    }

    #[test]
    fn test_unclamped_original_over_max_dimension_is_rejected() {
        let decoder = SvgDecoder::default();
        let request = DecodeRequest::new(SizeConstraint::original().with_max_dimension(None));
        let err = decoder
            .decode(solid_svg(MAX_DIMENSION + 1, 10), request)
            .unwrap_err();
        assert_eq!(err.stage(), Some("resolve"));
        assert!(matches!(
            err.root(),
            SvgDecodeError::DimensionExceedsLimit { .. }
        ));
        assert_eq!(err.category(), ErrorCategory::ResourceLimit);
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_default_clamp_protects_large_originals() {
        let decoder = SvgDecoder::default();
        let result = decoder
            .decode(solid_svg(20_000, 10_000), DecodeRequest::default())
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(result.bitmap.dimensions(), (4096, 2048));
    }

    #[test]
    fn test_check_dimensions_boundaries() {
        assert!(check_dimensions(MAX_DIMENSION, 1).is_ok());
        assert!(check_dimensions(MAX_DIMENSION + 1, 1).is_err());
        // 10000 x 10000 = exactly MAX_PIXELS
        assert!(check_dimensions(10_000, 10_000).is_ok());
        assert_eq!(10_000u64 * 10_000, MAX_PIXELS);
        assert!(check_dimensions(10_000, 10_001).is_err());
    }

    #[test]
    fn test_tiny_density_still_positive() {
        let size = resolve(
            IntrinsicSize::new(3.0, 3.0),
            &SizeConstraint::original(),
            0.01,
        )
        .unwrap();
        assert!(size.width >= 1 && size.height >= 1);
    }
}

mod input_edge_cases {
    use super::*;

    #[test]
    fn test_empty_input_is_not_applicable() {
        let decoder = SvgDecoder::default();
        let outcome = decoder.decode(Vec::new(), DecodeRequest::default()).unwrap();
        assert!(matches!(outcome, DecodeOutcome::NotApplicable));
    }

    #[test]
    fn test_png_signature_is_not_applicable() {
        let decoder = SvgDecoder::default();
        let png = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];
        let outcome = decoder
            .decode(png, DecodeRequest::default().with_mime_type("image/png"))
            .unwrap();
        assert!(!outcome.is_applicable());
    }

    #[test]
    fn test_svg_mime_with_garbage_is_parse_error() {
        let decoder = SvgDecoder::default();
        let err = decoder
            .decode(
                &b"definitely not xml"[..],
                DecodeRequest::default().with_mime_type("image/svg+xml"),
            )
            .unwrap_err();
        assert_eq!(err.stage(), Some("parse"));
        assert_eq!(err.category(), ErrorCategory::CodecError);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_xml_without_svg_root_is_parse_error() {
        let decoder = SvgDecoder::default();
        let err = decoder
            .decode(
                &br#"<html><body><svg-ish/></body></html>"#[..],
                DecodeRequest::default(),
            )
            .unwrap_err();
        assert!(matches!(err.root(), SvgDecodeError::ParseFailed { .. }));
    }

    #[test]
    fn test_text_without_fonts_still_decodes() {
        let decoder = SvgDecoder::new(DecoderConfig::default().with_font_policy(FontPolicy::Never));
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20"><text x="0" y="15">Hi</text></svg>"#;
        let result = decoder
            .decode(&svg[..], DecodeRequest::default())
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(result.bitmap.dimensions(), (40, 20));
    }

    #[test]
    fn test_strict_firewall_rejects_oversized_render() {
        let decoder =
            SvgDecoder::new(DecoderConfig::default().with_firewall(FirewallConfig::strict()));
        let request = DecodeRequest::new(SizeConstraint::original().with_max_dimension(Some(8192)));
        let err = decoder.decode(solid_svg(5000, 5000), request).unwrap_err();
        assert!(matches!(
            err.root(),
            SvgDecodeError::FirewallViolation { .. }
        ));
    }
}

mod normalize_edge_cases {
    use super::*;

    #[test]
    fn test_huge_stride_single_row() {
        let mut bytes = vec![0xEE; 4096];
        bytes[..4].copy_from_slice(&[1, 2, 3, 4]);
        let raw = RawPixelBuffer::new(1, 1, 4096, ChannelOrder::Argb, AlphaMode::Premultiplied, bytes);
        let bitmap = normalize(raw).unwrap();
        assert_eq!(bitmap.bytes(), &[2, 3, 4, 1]);
        assert!(bitmap.is_premultiplied());
    }

    #[test]
    fn test_error_message_names_sizes() {
        let raw = RawPixelBuffer::new(2, 2, 8, ChannelOrder::Rgba, AlphaMode::Straight, vec![0; 15]);
        let err = normalize(raw).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("2x2"), "{message}");
        assert!(message.contains("16"), "{message}");
        assert!(message.contains("15"), "{message}");
        assert_eq!(err.category(), ErrorCategory::InternalBug);
    }
}
