#![no_main]

use arbitrary::Arbitrary;
use lazy_svg::engine::{is_svg, SVG_DETECT_BUFFER_SIZE};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    mime_type: Option<&'a str>,
    head: &'a [u8],
}

fuzz_target!(|input: Input| {
    let detected = is_svg(input.mime_type, input.head);
    // Bytes past the probe window never change the answer.
    if input.head.len() > SVG_DETECT_BUFFER_SIZE {
        assert_eq!(
            detected,
            is_svg(input.mime_type, &input.head[..SVG_DETECT_BUFFER_SIZE])
        );
    }
});
