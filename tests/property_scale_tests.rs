use chart_geometry::core::{FieldValue, PixelRange, ScaleKind, ScaleOptions, create_scale};
use proptest::prelude::*;

proptest! {
    #[test]
    fn linear_maps_domain_ends_to_range_ends(
        lo in -1.0e6f64..1.0e6,
        width in 1.0e-3f64..1.0e6,
        start in -2_000.0f64..2_000.0,
        span in 1.0f64..4_000.0,
        flip in any::<bool>()
    ) {
        let hi = lo + width;
        let range = if flip {
            PixelRange::new(start + span, start)
        } else {
            PixelRange::new(start, start + span)
        };
        let scale = create_scale(
            ScaleKind::Linear,
            &[FieldValue::Number(hi), FieldValue::Number(lo)],
            range,
            &ScaleOptions::default(),
        );
        let tolerance = 1e-6 * span.max(1.0);
        prop_assert!((scale.map_number(lo).expect("lo") - range.start).abs() <= tolerance);
        prop_assert!((scale.map_number(hi).expect("hi") - range.end).abs() <= tolerance);
    }

    #[test]
    fn linear_invert_recovers_domain_values(
        lo in -1.0e4f64..1.0e4,
        width in 1.0f64..1.0e4,
        t in 0.0f64..1.0
    ) {
        let hi = lo + width;
        let value = lo + t * width;
        let scale = create_scale(
            ScaleKind::Linear,
            &[FieldValue::Number(lo), FieldValue::Number(hi)],
            PixelRange::new(600.0, 0.0),
            &ScaleOptions::default(),
        );
        let pixel = scale.map_number(value).expect("map");
        let recovered = scale
            .invert(pixel)
            .and_then(|value| value.as_number())
            .expect("invert");
        prop_assert!((recovered - value).abs() <= 1e-6 * width.max(1.0));
    }

    #[test]
    fn nice_domain_contains_the_data(
        lo in -1.0e5f64..1.0e5,
        width in 1.0e-2f64..1.0e5
    ) {
        let hi = lo + width;
        let scale = create_scale(
            ScaleKind::Linear,
            &[FieldValue::Number(lo), FieldValue::Number(hi)],
            PixelRange::new(0.0, 100.0),
            &ScaleOptions::default().with_nice(true),
        );
        let (start, end) = scale.numeric_domain().expect("numeric domain");
        prop_assert!(start <= lo);
        prop_assert!(end >= hi);
    }

    #[test]
    fn bands_stay_inside_the_range(
        count in 1usize..40,
        padding in 0.0f64..1.0,
        start in 0.0f64..500.0,
        span in 10.0f64..2_000.0
    ) {
        let values: Vec<FieldValue> = (0..count).map(|i| FieldValue::from(format!("c{i}"))).collect();
        let scale = create_scale(
            ScaleKind::OrdinalBand,
            &values,
            PixelRange::new(start, start + span),
            &ScaleOptions::default().with_padding(padding),
        );
        for value in &values {
            let leading = scale.map(value).expect("known category");
            prop_assert!(leading >= start - 1e-6);
            prop_assert!(leading + scale.bandwidth() <= start + span + 1e-6);
        }
    }

    #[test]
    fn log_scale_maps_every_positive_value(
        values in prop::collection::vec(1.0e-3f64..1.0e6, 2..30)
    ) {
        let field_values: Vec<FieldValue> = values.iter().copied().map(FieldValue::Number).collect();
        let scale = create_scale(
            ScaleKind::Logarithmic,
            &field_values,
            PixelRange::new(0.0, 400.0),
            &ScaleOptions::default(),
        );
        for value in values {
            let pixel = scale.map_number(value).expect("positive value maps");
            prop_assert!(pixel.is_finite());
            prop_assert!((-1e-6..=400.0 + 1e-6).contains(&pixel));
        }
    }
}
