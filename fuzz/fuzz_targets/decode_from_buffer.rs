#![no_main]

//! Fuzz target for the full decode pipeline.
//! Small fixed render target so arbitrary viewBoxes cannot allocate huge pixmaps.

use lazy_svg::engine::{DecoderConfig, FirewallConfig, FontPolicy, SvgDecoder};
use lazy_svg::ops::{DecodeRequest, Scale, SizeConstraint};
use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

static DECODER: OnceLock<SvgDecoder> = OnceLock::new();

fuzz_target!(|data: &[u8]| {
    let decoder = DECODER.get_or_init(|| {
        SvgDecoder::new(
            DecoderConfig::default()
                .with_font_policy(FontPolicy::Never)
                .with_firewall(FirewallConfig::strict())
                .with_max_dimension(Some(256)),
        )
    });
    let request = DecodeRequest::new(SizeConstraint::exact(64, 64, Scale::Fit))
        .with_mime_type("image/svg+xml");
    if let Ok(outcome) = decoder.decode(data, request) {
        if let Some(result) = outcome.into_result() {
            let (w, h) = result.bitmap.dimensions();
            assert_eq!(result.bitmap.bytes().len(), (w * h * 4) as usize);
        }
    }
});
