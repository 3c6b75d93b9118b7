use lazy_svg::engine::{
    is_svg, normalize, resolve, AlphaMode, ChannelOrder, IntrinsicSize, RawPixelBuffer,
};
use lazy_svg::ops::{Scale, SizeConstraint};
use proptest::prelude::*;

fn scale_strategy() -> impl Strategy<Value = Scale> {
    prop_oneof![Just(Scale::Fit), Just(Scale::Fill)]
}

fn constraint_strategy() -> impl Strategy<Value = SizeConstraint> {
    let max = prop_oneof![Just(None), (1u32..=4096).prop_map(Some)];
    let target = prop_oneof![
        Just(SizeConstraint::original()),
        (0u32..=2048, 0u32..=2048, scale_strategy())
            .prop_map(|(w, h, scale)| SizeConstraint::exact(w, h, scale)),
        (0u32..=2048).prop_map(SizeConstraint::width),
        (0u32..=2048).prop_map(SizeConstraint::height),
    ];
    (target, max).prop_map(|(constraint, max)| constraint.with_max_dimension(max))
}

fn channel_order_strategy() -> impl Strategy<Value = ChannelOrder> {
    prop_oneof![
        Just(ChannelOrder::Rgba),
        Just(ChannelOrder::Bgra),
        Just(ChannelOrder::Argb),
        Just(ChannelOrder::Abgr),
    ]
}

/// Where R, G, B and A live inside one source pixel.
fn rgba_positions(order: ChannelOrder) -> [usize; 4] {
    match order {
        ChannelOrder::Rgba => [0, 1, 2, 3],
        ChannelOrder::Bgra => [2, 1, 0, 3],
        ChannelOrder::Argb => [1, 2, 3, 0],
        ChannelOrder::Abgr => [3, 2, 1, 0],
    }
}

proptest! {
    #[test]
    fn resolved_size_is_always_positive(
        width in 0.0f32..5000.0,
        height in 0.0f32..5000.0,
        density in 0.25f32..4.0,
        constraint in constraint_strategy(),
    ) {
        // Original at high density can legitimately exceed the global limits;
        // the resolver itself must still return a positive size.
        let size = resolve(IntrinsicSize::new(width, height), &constraint, density).unwrap();
        prop_assert!(size.width >= 1);
        prop_assert!(size.height >= 1);
        if let Some(max) = constraint.max_dimension {
            prop_assert!(size.width <= max.max(1));
            prop_assert!(size.height <= max.max(1));
        }
    }

    #[test]
    fn fit_stays_within_bounds(
        width in 1u32..4000,
        height in 1u32..4000,
        bound_w in 0u32..2048,
        bound_h in 0u32..2048,
    ) {
        let constraint = SizeConstraint::exact(bound_w, bound_h, Scale::Fit).with_max_dimension(None);
        let size = resolve(IntrinsicSize::new(width as f32, height as f32), &constraint, 1.0).unwrap();
        prop_assert!(size.width <= bound_w.max(1), "{:?}", size);
        prop_assert!(size.height <= bound_h.max(1), "{:?}", size);
    }

    #[test]
    fn fit_reaches_one_bound(
        width in 1u32..4000,
        height in 1u32..4000,
        bound_w in 1u32..2048,
        bound_h in 1u32..2048,
    ) {
        let constraint = SizeConstraint::exact(bound_w, bound_h, Scale::Fit).with_max_dimension(None);
        let size = resolve(IntrinsicSize::new(width as f32, height as f32), &constraint, 1.0).unwrap();
        prop_assert!(
            size.width.abs_diff(bound_w) <= 1 || size.height.abs_diff(bound_h) <= 1,
            "{:?} for {}x{} into {}x{}", size, width, height, bound_w, bound_h
        );
    }

    #[test]
    fn fill_covers_both_bounds(
        width in 1u32..4000,
        height in 1u32..4000,
        bound_w in 1u32..2048,
        bound_h in 1u32..2048,
    ) {
        let constraint = SizeConstraint::exact(bound_w, bound_h, Scale::Fill).with_max_dimension(None);
        let size = resolve(IntrinsicSize::new(width as f32, height as f32), &constraint, 1.0).unwrap();
        prop_assert!(size.width >= bound_w && size.height >= bound_h, "{:?}", size);
        prop_assert!(
            size.width.abs_diff(bound_w) <= 1 || size.height.abs_diff(bound_h) <= 1,
            "{:?} for {}x{} over {}x{}", size, width, height, bound_w, bound_h
        );
    }

    #[test]
    fn aspect_ratio_is_kept_to_a_pixel(
        width in 1u32..4000,
        height in 1u32..4000,
        bound_w in 1u32..2048,
        bound_h in 1u32..2048,
        scale in scale_strategy(),
    ) {
        let constraint = SizeConstraint::exact(bound_w, bound_h, scale).with_max_dimension(None);
        let size = resolve(IntrinsicSize::new(width as f32, height as f32), &constraint, 1.0).unwrap();
        // out_w / out_h == width / height, allowing one pixel of truncation per axis
        let skew = (size.width as f64 * height as f64 - size.height as f64 * width as f64).abs();
        prop_assert!(skew <= (width + height) as f64, "{:?} for {}x{}", size, width, height);
    }

    #[test]
    fn normalize_packs_and_remaps_every_pixel(
        width in 1u32..16,
        height in 1u32..16,
        padding in 0usize..16,
        order in channel_order_strategy(),
        seed in any::<u8>(),
    ) {
        let stride = width as usize * 4 + padding;
        let bytes: Vec<u8> = (0..stride * height as usize)
            .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
            .collect();
        let raw = RawPixelBuffer::new(width, height, stride, order, AlphaMode::Straight, bytes.clone());
        let bitmap = normalize(raw).unwrap();

        prop_assert_eq!(bitmap.bytes().len(), (width * height * 4) as usize);
        prop_assert_eq!(bitmap.alpha(), AlphaMode::Straight);
        let positions = rgba_positions(order);
        for y in 0..height {
            for x in 0..width {
                let base = y as usize * stride + x as usize * 4;
                let expected = positions.map(|p| bytes[base + p]);
                prop_assert_eq!(bitmap.pixel(x, y), Some(expected));
            }
        }
    }

    #[test]
    fn content_not_starting_with_bracket_is_never_svg(head in proptest::collection::vec(any::<u8>(), 0..2048)) {
        prop_assume!(head.first() != Some(&b'<'));
        prop_assert!(!is_svg(None, &head));
    }

    #[test]
    fn svg_prefix_is_always_detected(tail in proptest::collection::vec(any::<u8>(), 0..2048)) {
        let mut head = b"<svg".to_vec();
        head.extend(tail);
        prop_assert!(is_svg(None, &head));
    }
}
