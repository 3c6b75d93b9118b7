#![no_main]

use arbitrary::Arbitrary;
use lazy_svg::engine::{normalize, AlphaMode, ChannelOrder, RawPixelBuffer};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    width: u8,
    height: u8,
    bytes_per_row: u16,
    order: u8,
    premultiplied: bool,
    bytes: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let order = match input.order % 4 {
        0 => ChannelOrder::Rgba,
        1 => ChannelOrder::Bgra,
        2 => ChannelOrder::Argb,
        _ => ChannelOrder::Abgr,
    };
    let alpha = if input.premultiplied {
        AlphaMode::Premultiplied
    } else {
        AlphaMode::Straight
    };
    let raw = RawPixelBuffer::new(
        input.width as u32,
        input.height as u32,
        input.bytes_per_row as usize,
        order,
        alpha,
        input.bytes,
    );
    if let Ok(bitmap) = normalize(raw) {
        assert_eq!(
            bitmap.bytes().len(),
            input.width as usize * input.height as usize * 4
        );
        assert_eq!(bitmap.alpha(), alpha);
    }
});
