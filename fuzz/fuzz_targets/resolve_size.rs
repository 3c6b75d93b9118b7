#![no_main]

use arbitrary::Arbitrary;
use lazy_svg::engine::{resolve, IntrinsicSize};
use lazy_svg::ops::{Scale, SizeConstraint};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    intrinsic_width: f32,
    intrinsic_height: f32,
    density: f32,
    target: u8,
    width: u16,
    height: u16,
    fill: bool,
    max_dimension: Option<u16>,
}

fuzz_target!(|input: Input| {
    let scale = if input.fill { Scale::Fill } else { Scale::Fit };
    let constraint = match input.target % 4 {
        0 => SizeConstraint::original(),
        1 => SizeConstraint::exact(input.width as u32, input.height as u32, scale),
        2 => SizeConstraint::width(input.width as u32),
        _ => SizeConstraint::height(input.height as u32),
    }
    .with_max_dimension(input.max_dimension.map(u32::from));

    let intrinsic = IntrinsicSize::new(input.intrinsic_width, input.intrinsic_height);
    if let Ok(size) = resolve(intrinsic, &constraint, input.density) {
        assert!(size.width >= 1 && size.height >= 1);
        if let Some(max) = constraint.max_dimension {
            assert!(size.width <= max.max(1) && size.height <= max.max(1));
        }
    }
});
