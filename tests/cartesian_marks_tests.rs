use approx::assert_relative_eq;
use chart_geometry::core::{
    FieldSelection, FieldValue, PixelRange, Row, Scale, ScaleKind, ScaleOptions, create_scale,
};
use chart_geometry::marks::{BarOrientation, position_bars, position_lines, position_points};

fn category_scale(labels: &[&str], range: PixelRange) -> Scale {
    let values: Vec<FieldValue> = labels.iter().map(|label| FieldValue::from(*label)).collect();
    create_scale(
        ScaleKind::OrdinalBand,
        &values,
        range,
        &ScaleOptions::default().with_padding(0.0),
    )
}

fn value_scale(values: &[f64], range: PixelRange) -> Scale {
    let values: Vec<FieldValue> = values.iter().copied().map(FieldValue::Number).collect();
    create_scale(
        ScaleKind::Linear,
        &values,
        range,
        &ScaleOptions::default().with_nice(false).with_force_zero(true),
    )
}

#[test]
fn bars_span_from_zero_baseline_in_both_directions() {
    let rows = vec![
        Row::new().with("k", "a").with("v", 10.0),
        Row::new().with("k", "b").with("v", -5.0),
    ];
    let fields = FieldSelection::single("k", "v").expect("fields");
    let x = category_scale(&["a", "b"], PixelRange::new(0.0, 200.0));
    let y = value_scale(&[10.0, -5.0], PixelRange::new(150.0, 0.0));
    assert_relative_eq!(y.baseline(), 100.0);

    let bars = position_bars(&rows, &fields, &x, &y, BarOrientation::Vertical, 0.0);
    assert_eq!(bars.len(), 2);
    assert_relative_eq!(bars[0].rect.x, 0.0);
    assert_relative_eq!(bars[0].rect.width, 100.0);
    assert_relative_eq!(bars[0].rect.y, 0.0);
    assert_relative_eq!(bars[0].rect.bottom(), 100.0);
    assert_relative_eq!(bars[1].rect.y, 100.0);
    assert_relative_eq!(bars[1].rect.height, 50.0);
}

#[test]
fn grouped_bars_split_the_band_between_series() {
    let rows = vec![Row::new().with("k", "a").with("2023", 4.0).with("2024", 8.0)];
    let fields = FieldSelection::new("k", ["2023", "2024"]).expect("fields");
    let x = category_scale(&["a"], PixelRange::new(0.0, 100.0));
    let y = value_scale(&[4.0, 8.0], PixelRange::new(80.0, 0.0));

    let bars = position_bars(&rows, &fields, &x, &y, BarOrientation::Vertical, 0.2);
    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0].series, "2023");
    assert_relative_eq!(bars[0].rect.x, 5.0);
    assert_relative_eq!(bars[0].rect.width, 40.0);
    assert_relative_eq!(bars[1].rect.x, 55.0);
    assert_relative_eq!(bars[1].rect.y, 0.0);
    assert_relative_eq!(bars[0].rect.y, 40.0);
}

#[test]
fn horizontal_bars_swap_axes() {
    let rows = vec![Row::new().with("k", "a").with("v", 5.0)];
    let fields = FieldSelection::single("k", "v").expect("fields");
    let y = category_scale(&["a"], PixelRange::new(0.0, 40.0));
    let x = value_scale(&[5.0], PixelRange::new(0.0, 100.0));

    let bars = position_bars(&rows, &fields, &y, &x, BarOrientation::Horizontal, 0.0);
    assert_relative_eq!(bars[0].rect.x, 0.0);
    assert_relative_eq!(bars[0].rect.width, 100.0);
    assert_relative_eq!(bars[0].rect.height, 40.0);
}

#[test]
fn points_skip_rows_without_numeric_values() {
    let rows = vec![
        Row::new().with("k", "a").with("v", 1.0),
        Row::new().with("k", "b").with("v", FieldValue::Null),
        Row::new().with("k", "c").with("v", "oops"),
        Row::new().with("k", "d").with("v", 3.0),
    ];
    let fields = FieldSelection::single("k", "v").expect("fields");
    let labels: Vec<FieldValue> = rows.iter().map(|row| row.get("k").clone()).collect();
    let x = create_scale(
        ScaleKind::OrdinalPoint,
        &labels,
        PixelRange::new(0.0, 300.0),
        &ScaleOptions::default().with_padding(0.0),
    );
    let y = value_scale(&[1.0, 3.0], PixelRange::new(90.0, 0.0));

    let points = position_points(&rows, &fields, &x, &y);
    let indices: Vec<usize> = points.iter().map(|point| point.row_index).collect();
    assert_eq!(indices, vec![0, 3]);
    assert_relative_eq!(points[1].x, 300.0);
    assert_relative_eq!(points[1].y, 0.0);

    let lines = position_lines(&rows, &fields, &x, &y);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].row_indices, vec![0, 3]);
    assert_relative_eq!(lines[0].points[0].y, 60.0);
}

#[test]
fn unknown_categories_produce_no_marks() {
    let rows = vec![Row::new().with("k", "missing").with("v", 2.0)];
    let fields = FieldSelection::single("k", "v").expect("fields");
    let x = category_scale(&["a"], PixelRange::new(0.0, 100.0));
    let y = value_scale(&[2.0], PixelRange::new(100.0, 0.0));
    assert!(position_bars(&rows, &fields, &x, &y, BarOrientation::Vertical, 0.0).is_empty());
    assert!(position_points(&rows, &fields, &x, &y).is_empty());
}
