use approx::assert_relative_eq;
use chart_geometry::config::{
    AxisConfig, Edge, LegendAlignment, LegendConfig, LegendPlacement,
};
use chart_geometry::core::{
    FieldValue, PixelRange, Scale, ScaleKind, ScaleOptions, Viewport, create_scale,
};
use chart_geometry::layout::{LayoutBox, compute_layout};
use chart_geometry::render::{
    BuiltinPalettes, Color, ColorAssignment, CustomPalettes, RenderFrame, build_axis,
    build_legend, resolve_palette,
};
use indexmap::IndexMap;

const EPS: f64 = 1e-6;

fn fixed_layout() -> LayoutBox {
    let canvas = Viewport::new(500, 300);
    compute_layout(canvas, &LegendConfig::hidden(), &[])
}

fn value_scale(range: PixelRange) -> Scale {
    let values = [FieldValue::Number(0.0), FieldValue::Number(100.0)];
    create_scale(ScaleKind::Linear, &values, range, &ScaleOptions::default())
}

#[test]
fn vertical_axis_ticks_follow_the_scale() {
    let layout = fixed_layout();
    let inner = layout.inner_rect();
    let scale = value_scale(PixelRange::new(inner.bottom(), inner.y));
    let axis = build_axis(&AxisConfig::value_y(), &scale, &layout).expect("left axis");

    assert_eq!(axis.edge, Edge::Left);
    assert_relative_eq!(axis.domain_line.start.x, inner.x);
    assert_relative_eq!(axis.domain_line.start.y, inner.y);
    assert_relative_eq!(axis.domain_line.end.y, inner.bottom());

    let first = axis.ticks.first().expect("ticks");
    let last = axis.ticks.last().expect("ticks");
    assert_eq!(first.tick.label, "0");
    assert_relative_eq!(first.tick.position, inner.bottom(), epsilon = EPS);
    assert_eq!(last.tick.label, "100");
    assert_relative_eq!(last.tick.position, inner.y, epsilon = EPS);

    for tick in &axis.ticks {
        assert_relative_eq!(tick.mark.start.x, inner.x);
        assert_relative_eq!(tick.mark.end.x, inner.x - 6.0);
        assert_relative_eq!(tick.label_anchor.x, inner.x - 10.0);
        assert_relative_eq!(tick.label_anchor.y, tick.tick.position);
    }

    // Value axes draw a gridline through every tick.
    assert_eq!(axis.gridlines.len(), axis.ticks.len());
    for (grid, tick) in axis.gridlines.iter().zip(&axis.ticks) {
        assert_relative_eq!(grid.start.x, inner.x);
        assert_relative_eq!(grid.end.x, inner.right());
        assert_relative_eq!(grid.start.y, tick.tick.position);
    }
}

#[test]
fn crowded_category_labels_are_thinned() {
    let layout = fixed_layout();
    let inner = layout.inner_rect();
    let labels: Vec<FieldValue> = (0..40)
        .map(|index| FieldValue::from(format!("category-{index:02}")))
        .collect();
    let scale = create_scale(
        ScaleKind::OrdinalBand,
        &labels,
        PixelRange::new(inner.x, inner.right()),
        &ScaleOptions::default(),
    );
    let axis = build_axis(&AxisConfig::category_x(), &scale, &layout).expect("bottom axis");

    assert_eq!(axis.ticks.len(), 40);
    assert!(axis.ticks[0].label_visible);
    assert!(axis.ticks[39].label_visible);
    let visible = axis.visible_labels().count();
    assert!(visible < 40, "expected thinning, {visible} labels visible");

    let kept: Vec<f64> = axis.visible_labels().map(|tick| tick.tick.position).collect();
    let label_width = "category-00".len() as f64 * axis.font_size * 0.6;
    for pair in kept.windows(2) {
        assert!(pair[1] - pair[0] >= label_width);
    }
    assert!(axis.gridlines.is_empty());
    for tick in &axis.ticks {
        assert!(tick.mark.end.y > tick.mark.start.y);
    }
}

#[test]
fn axis_title_sits_beyond_the_labels() {
    let layout = fixed_layout();
    let inner = layout.inner_rect();
    let scale = value_scale(PixelRange::new(inner.bottom(), inner.y));
    let axis = build_axis(&AxisConfig::value_y().with_title("Revenue"), &scale, &layout)
        .expect("left axis");

    let title = axis.title.as_ref().expect("title");
    assert_eq!(title.text, "Revenue");
    assert_relative_eq!(title.rotation_deg, -90.0);
    assert!(title.anchor.x < inner.x - 10.0);
    assert_relative_eq!(title.anchor.y, inner.y + inner.height * 0.5);
}

#[test]
fn hidden_axis_has_no_geometry() {
    let layout = fixed_layout();
    let scale = value_scale(PixelRange::new(0.0, 100.0));
    assert!(build_axis(&AxisConfig::hidden(), &scale, &layout).is_none());
}

#[test]
fn axis_primitives_land_in_the_frame() {
    let layout = fixed_layout();
    let inner = layout.inner_rect();
    let scale = value_scale(PixelRange::new(inner.bottom(), inner.y));
    let axis = build_axis(&AxisConfig::value_y(), &scale, &layout).expect("left axis");

    let mut frame = RenderFrame::new(layout.canvas);
    axis.append_to_frame(&mut frame);
    // Gridlines, domain line and one mark per tick.
    assert_eq!(frame.lines.len(), axis.gridlines.len() + 1 + axis.ticks.len());
    assert_eq!(frame.texts.len(), axis.visible_labels().count());
}

fn assignment(labels: &[&str]) -> ColorAssignment {
    let palette = resolve_palette(&BuiltinPalettes, "category10");
    ColorAssignment::resolve(labels.iter().copied(), &palette, false)
}

#[test]
fn right_legend_stacks_entries_inside_its_band() {
    let layout = compute_layout(Viewport::new(800, 600), &LegendConfig::default(), &[]);
    let band = layout.legend_band.expect("legend band");
    let legend = build_legend(&LegendConfig::default(), &layout, &assignment(&["a", "b", "c"]), None)
        .expect("legend");

    assert_eq!(legend.entries.len(), 3);
    let labels: Vec<&str> = legend.entries.iter().map(|entry| entry.label.as_str()).collect();
    assert_eq!(labels, vec!["a", "b", "c"]);
    for entry in &legend.entries {
        assert_relative_eq!(entry.swatch.x, band.x + 4.0);
        assert!(band.contains_rect(entry.swatch, EPS));
        assert!(entry.text_anchor.x > entry.swatch.right());
        assert_eq!(entry.text, entry.label);
    }
    assert!(legend.entries[0].swatch.y < legend.entries[1].swatch.y);
    assert_eq!(legend.entries[0].color.to_hex(), "#1f77b4");
}

#[test]
fn legend_shows_series_totals_on_request() {
    let config = LegendConfig::default().with_show_values(true);
    let layout = compute_layout(Viewport::new(800, 600), &config, &[]);
    let mut totals = IndexMap::new();
    totals.insert("a".to_owned(), 12.0);
    totals.insert("b".to_owned(), 2.5);

    let legend = build_legend(&config, &layout, &assignment(&["a", "b"]), Some(&totals))
        .expect("legend");
    assert_eq!(legend.entries[0].text, "a (12)");
    assert_eq!(legend.entries[1].text, "b (2.5)");
    assert_eq!(legend.entries[1].total, Some(2.5));

    let plain = build_legend(&LegendConfig::default(), &layout, &assignment(&["a"]), Some(&totals))
        .expect("legend");
    assert_eq!(plain.entries[0].text, "a");
}

#[test]
fn bottom_legend_wraps_rows_and_never_leaves_its_band() {
    let config = LegendConfig::default()
        .with_placement(LegendPlacement::Bottom)
        .with_alignment(LegendAlignment::Start);
    let layout = compute_layout(Viewport::new(320, 240), &config, &[]);
    let band = layout.legend_band.expect("legend band");
    let labels: Vec<String> = (0..12).map(|index| format!("series {index}")).collect();
    let refs: Vec<&str> = labels.iter().map(String::as_str).collect();

    let legend = build_legend(&config, &layout, &assignment(&refs), None).expect("legend");
    assert!(!legend.entries.is_empty());
    assert!(legend.entries.len() <= labels.len());
    assert_relative_eq!(legend.entries[0].swatch.x, band.x + 4.0);
    for entry in &legend.entries {
        assert!(band.contains_rect(entry.swatch, EPS));
    }
    for pair in legend.entries.windows(2) {
        let same_row = (pair[0].swatch.y - pair[1].swatch.y).abs() < EPS;
        if same_row {
            assert!(pair[1].swatch.x > pair[0].swatch.right());
        }
    }
}

#[test]
fn hidden_legend_produces_no_geometry() {
    let layout = compute_layout(Viewport::new(800, 600), &LegendConfig::hidden(), &[]);
    assert!(layout.legend_band.is_none());
    assert!(build_legend(&LegendConfig::hidden(), &layout, &assignment(&["a"]), None).is_none());
}

#[test]
fn custom_palettes_shadow_builtins() {
    let red = Color::rgb(1.0, 0.0, 0.0);
    let palettes = CustomPalettes::new()
        .with_palette("brand", vec![red])
        .with_palette("empty", Vec::new());

    assert_eq!(resolve_palette(&palettes, "brand"), vec![red]);
    assert_eq!(resolve_palette(&palettes, "pastel").len(), 9);
    assert_eq!(resolve_palette(&palettes, "empty").len(), 10);

    let colors = ColorAssignment::resolve(["x", "y"], &[red], false);
    assert_eq!(colors.color_for("y"), red);
    assert_ne!(colors.color_for("missing"), red);
}
