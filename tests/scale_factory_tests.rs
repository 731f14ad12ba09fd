use approx::assert_relative_eq;
use chart_geometry::core::{FieldValue, PixelRange, ScaleKind, ScaleOptions, create_scale};

fn numbers(values: &[f64]) -> Vec<FieldValue> {
    values.iter().copied().map(FieldValue::Number).collect()
}

#[test]
fn linear_maps_extent_onto_range() {
    let scale = create_scale(
        ScaleKind::Linear,
        &numbers(&[10.0, 20.0, 30.0]),
        PixelRange::new(0.0, 300.0),
        &ScaleOptions::default(),
    );
    assert_eq!(scale.kind(), ScaleKind::Linear);
    assert_eq!(scale.numeric_domain(), Some((10.0, 30.0)));
    assert_relative_eq!(scale.map_number(10.0).expect("min"), 0.0);
    assert_relative_eq!(scale.map_number(20.0).expect("mid"), 150.0);
    assert_relative_eq!(scale.map_number(30.0).expect("max"), 300.0);
}

#[test]
fn linear_drops_non_numeric_values_before_extent() {
    let values = vec![
        FieldValue::from("n/a"),
        FieldValue::Number(1.0),
        FieldValue::Null,
        FieldValue::from("3"),
    ];
    let scale = create_scale(
        ScaleKind::Linear,
        &values,
        PixelRange::new(0.0, 100.0),
        &ScaleOptions::default(),
    );
    assert_eq!(scale.numeric_domain(), Some((1.0, 3.0)));
    assert_eq!(scale.map(&FieldValue::from("n/a")), None);
}

#[test]
fn nice_rounds_domain_outward() {
    let scale = create_scale(
        ScaleKind::Linear,
        &numbers(&[3.0, 47.0]),
        PixelRange::new(0.0, 500.0),
        &ScaleOptions::default().with_nice(true),
    );
    assert_eq!(scale.numeric_domain(), Some((0.0, 50.0)));
}

#[test]
fn force_zero_and_overrides_shape_the_domain() {
    let forced = create_scale(
        ScaleKind::Linear,
        &numbers(&[5.0, 10.0]),
        PixelRange::new(100.0, 0.0),
        &ScaleOptions::default().with_force_zero(true),
    );
    assert_eq!(forced.numeric_domain(), Some((0.0, 10.0)));
    assert_relative_eq!(forced.baseline(), 100.0);

    let overridden = create_scale(
        ScaleKind::Linear,
        &numbers(&[5.0, 10.0]),
        PixelRange::new(0.0, 100.0),
        &ScaleOptions::default().with_domain_override(Some(-5.0), None),
    );
    assert_eq!(overridden.numeric_domain(), Some((-5.0, 10.0)));
}

#[test]
fn empty_linear_domain_is_still_usable() {
    let scale = create_scale(
        ScaleKind::Linear,
        &[],
        PixelRange::new(0.0, 100.0),
        &ScaleOptions::default(),
    );
    assert_eq!(scale.numeric_domain(), Some((0.0, 1.0)));
    assert_relative_eq!(scale.map_number(0.5).expect("mid"), 50.0);
}

#[test]
fn single_value_domain_maps_to_range_middle() {
    let scale = create_scale(
        ScaleKind::Linear,
        &numbers(&[7.0]),
        PixelRange::new(0.0, 80.0),
        &ScaleOptions::default(),
    );
    assert_relative_eq!(scale.map_number(7.0).expect("flat"), 40.0);
}

#[test]
fn log_scale_filters_non_positive_values() {
    let scale = create_scale(
        ScaleKind::Logarithmic,
        &numbers(&[0.0, 1.0, -4.0, 100.0]),
        PixelRange::new(0.0, 200.0),
        &ScaleOptions::default(),
    );
    assert_eq!(scale.kind(), ScaleKind::Logarithmic);
    assert_eq!(scale.numeric_domain(), Some((1.0, 100.0)));
    assert_relative_eq!(scale.map_number(10.0).expect("decade"), 100.0, epsilon = 1e-9);
    assert_eq!(scale.map_number(0.0), None);
}

#[test]
fn degenerate_log_domain_falls_back_to_linear() {
    let scale = create_scale(
        ScaleKind::Logarithmic,
        &numbers(&[-5.0, 0.0, 10.0]),
        PixelRange::new(0.0, 150.0),
        &ScaleOptions::default(),
    );
    assert_eq!(scale.kind(), ScaleKind::Linear);
    assert_eq!(scale.numeric_domain(), Some((-5.0, 10.0)));
    assert_relative_eq!(scale.map_number(0.0).expect("zero"), 50.0);
}

#[test]
fn log_over_only_non_positive_values_falls_back_to_linear() {
    let scale = create_scale(
        ScaleKind::Logarithmic,
        &numbers(&[-3.0, 0.0]),
        PixelRange::new(0.0, 300.0),
        &ScaleOptions::default().with_nice(false),
    );
    assert_eq!(scale.kind(), ScaleKind::Linear);
    assert_eq!(scale.numeric_domain(), Some((-3.0, 0.0)));
    assert_relative_eq!(scale.map_number(-3.0).expect("min"), 0.0);
    assert_relative_eq!(scale.map_number(-1.5).expect("mid"), 150.0);
    assert_relative_eq!(scale.map_number(0.0).expect("max"), 300.0);
}

#[test]
fn log_over_a_single_positive_value_falls_back_to_linear() {
    let range = PixelRange::new(0.0, 120.0);
    let flat = create_scale(
        ScaleKind::Logarithmic,
        &numbers(&[4.0, 4.0]),
        range,
        &ScaleOptions::default().with_nice(false),
    );
    assert_eq!(flat.kind(), ScaleKind::Linear);
    assert_eq!(flat.numeric_domain(), Some((4.0, 4.0)));
    assert_relative_eq!(flat.map_number(4.0).expect("flat"), 60.0);

    let mixed = create_scale(
        ScaleKind::Logarithmic,
        &numbers(&[-2.0, 5.0]),
        range,
        &ScaleOptions::default().with_nice(false),
    );
    assert_eq!(mixed.kind(), ScaleKind::Linear);
    assert_eq!(mixed.numeric_domain(), Some((-2.0, 5.0)));
    assert_relative_eq!(mixed.map_number(5.0).expect("max"), 120.0);
}

#[test]
fn temporal_parses_iso_text_and_epoch_numbers() {
    let text = vec![
        FieldValue::from("2024-01-03"),
        FieldValue::from("not a date"),
        FieldValue::from("2024-01-01T00:00:00Z"),
    ];
    let scale = create_scale(
        ScaleKind::Temporal,
        &text,
        PixelRange::new(0.0, 200.0),
        &ScaleOptions::default(),
    );
    assert_eq!(scale.kind(), ScaleKind::Temporal);
    assert_relative_eq!(scale.map(&FieldValue::from("2024-01-01")).expect("start"), 0.0);
    assert_relative_eq!(scale.map(&FieldValue::from("2024-01-02")).expect("mid"), 100.0);

    let epoch = numbers(&[0.0, 86_400_000.0]);
    let scale = create_scale(
        ScaleKind::Temporal,
        &epoch,
        PixelRange::new(0.0, 100.0),
        &ScaleOptions::default(),
    );
    assert_eq!(scale.kind(), ScaleKind::Temporal);
    assert_eq!(scale.numeric_domain(), Some((0.0, 86_400_000.0)));
}

#[test]
fn temporal_without_dates_falls_back_to_ordinal_points() {
    let values = vec![FieldValue::from("north"), FieldValue::from("south")];
    let scale = create_scale(
        ScaleKind::Temporal,
        &values,
        PixelRange::new(0.0, 100.0),
        &ScaleOptions::default().with_padding(0.0),
    );
    assert_eq!(scale.kind(), ScaleKind::OrdinalPoint);
    let categories: Vec<&str> = scale
        .categories()
        .expect("categories")
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(categories, vec!["north", "south"]);
    assert_relative_eq!(scale.map(&FieldValue::from("south")).expect("south"), 100.0);
}

#[test]
fn band_scale_deduplicates_and_skips_nulls() {
    let values = vec![
        FieldValue::from("a"),
        FieldValue::from("b"),
        FieldValue::from("a"),
        FieldValue::Null,
    ];
    let scale = create_scale(
        ScaleKind::OrdinalBand,
        &values,
        PixelRange::new(0.0, 200.0),
        &ScaleOptions::default().with_padding(0.0),
    );
    assert_eq!(scale.categories().map(|keys| keys.len()), Some(2));
    assert_relative_eq!(scale.map(&FieldValue::from("a")).expect("a"), 0.0);
    assert_relative_eq!(scale.bandwidth(), 100.0);
    assert_relative_eq!(scale.map_center(&FieldValue::from("b")).expect("b"), 150.0);
    assert_eq!(scale.map(&FieldValue::from("zzz")), None);
}

#[test]
fn point_scale_applies_half_step_padding_at_ends() {
    let values = vec![FieldValue::from("a"), FieldValue::from("b"), FieldValue::from("c")];
    let scale = create_scale(
        ScaleKind::OrdinalPoint,
        &values,
        PixelRange::new(0.0, 300.0),
        &ScaleOptions::default().with_padding(0.5),
    );
    // space = 3 - 1 + 2 * 0.5 = 3, so step = 100 and the first point sits
    // half a step in.
    assert_relative_eq!(scale.step(), 100.0);
    assert_relative_eq!(scale.map(&FieldValue::from("a")).expect("a"), 50.0);
    assert_relative_eq!(scale.map(&FieldValue::from("c")).expect("c"), 250.0);
}

#[test]
fn reverse_option_flips_the_range() {
    let scale = create_scale(
        ScaleKind::Linear,
        &numbers(&[0.0, 10.0]),
        PixelRange::new(0.0, 100.0),
        &ScaleOptions::default().with_reverse(true),
    );
    assert_relative_eq!(scale.map_number(0.0).expect("zero"), 100.0);
    assert_relative_eq!(scale.map_number(10.0).expect("ten"), 0.0);
}

#[test]
fn identical_inputs_build_identical_scales() {
    let values = numbers(&[1.5, 9.25, 4.0]);
    let options = ScaleOptions::default().with_nice(true);
    let a = create_scale(ScaleKind::SquareRoot, &values, PixelRange::new(0.0, 64.0), &options);
    let b = create_scale(ScaleKind::SquareRoot, &values, PixelRange::new(0.0, 64.0), &options);
    assert_eq!(a, b);
}

#[test]
fn linear_ticks_use_round_steps() {
    let scale = create_scale(
        ScaleKind::Linear,
        &numbers(&[0.0, 10.0]),
        PixelRange::new(0.0, 100.0),
        &ScaleOptions::default(),
    );
    let ticks = scale.ticks(5);
    let labels: Vec<&str> = ticks.iter().map(|tick| tick.label.as_str()).collect();
    assert_eq!(labels, vec!["0", "2", "4", "6", "8", "10"]);
    assert_relative_eq!(ticks[1].position, 20.0);
}

#[test]
fn ordinal_ticks_sit_at_band_centres() {
    let values = vec![FieldValue::from("x"), FieldValue::from("y")];
    let scale = create_scale(
        ScaleKind::OrdinalBand,
        &values,
        PixelRange::new(0.0, 100.0),
        &ScaleOptions::default().with_padding(0.0),
    );
    let positions: Vec<f64> = scale.ticks(10).iter().map(|tick| tick.position).collect();
    assert_eq!(positions, vec![25.0, 75.0]);
}

#[test]
fn scale_kind_names_round_trip_through_parsing() {
    for kind in [
        ScaleKind::Linear,
        ScaleKind::Logarithmic,
        ScaleKind::SquareRoot,
        ScaleKind::Temporal,
        ScaleKind::OrdinalBand,
        ScaleKind::OrdinalPoint,
    ] {
        assert_eq!(kind.to_string().parse::<ScaleKind>().expect("parse"), kind);
    }
}
