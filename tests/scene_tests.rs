use approx::assert_relative_eq;
use chart_geometry::api::{ChartEngine, ChartEngineConfig, ChartScene, build_scene};
use chart_geometry::config::{
    AxisConfig, AxisPlacement, BarSettings, ChartDocument, ChartKind, LegendConfig, TreemapSettings,
};
use chart_geometry::core::{DataSet, FieldSelection, FieldValue, Row, ScaleKind, Viewport};
use chart_geometry::error::ChartError;
use chart_geometry::marks::{BarGeometry, BarOrientation, MarkGeometry, SortMode};
use chart_geometry::render::{BuiltinPalettes, NullRenderer, Renderer};

const EPS: f64 = 1e-6;

fn sales() -> DataSet {
    DataSet::from_rows(vec![
        Row::new().with("region", "north").with("city", "oslo").with("sales", 12.0).with("target", 10.0),
        Row::new().with("region", "north").with("city", "bergen").with("sales", -4.0).with("target", 6.0),
        Row::new().with("region", "south").with("city", "rome").with("sales", 7.0).with("target", 9.0),
        Row::new().with("region", "east").with("city", "kyiv").with("sales", 3.0).with("target", FieldValue::Null),
    ])
}

fn scene_for(document: &ChartDocument, dataset: &DataSet) -> ChartScene {
    build_scene(document, dataset, Viewport::new(800, 600), &BuiltinPalettes).expect("scene")
}

fn points(scene: &ChartScene) -> Vec<(f64, f64)> {
    scene
        .marks
        .iter()
        .filter_map(|mark| match mark {
            MarkGeometry::Point(point) => Some((point.x, point.y)),
            _ => None,
        })
        .collect()
}

fn bars(scene: &ChartScene) -> Vec<&BarGeometry> {
    scene
        .marks
        .iter()
        .filter_map(|mark| match mark {
            MarkGeometry::Bar(bar) => Some(bar),
            _ => None,
        })
        .collect()
}

fn positive_sales() -> DataSet {
    DataSet::from_rows(vec![
        Row::new().with("city", "oslo").with("sales", 12.0),
        Row::new().with("city", "rome").with("sales", 7.0),
        Row::new().with("city", "kyiv").with("sales", 3.0),
    ])
}

fn assert_one_horizontal_bar_per_row(scene: &ChartScene) {
    assert_eq!(scene.x_scale.as_ref().map(|scale| scale.kind()), Some(ScaleKind::Linear));
    assert_eq!(scene.y_scale.as_ref().map(|scale| scale.kind()), Some(ScaleKind::OrdinalBand));

    let bars = bars(scene);
    assert_eq!(bars.len(), 3);
    let inner = scene.layout.inner_rect();
    for bar in &bars {
        assert!(bar.rect.width > 0.0, "{} has no length", bar.label);
        assert!(bar.rect.height > 0.0, "{} has no thickness", bar.label);
        assert!(inner.contains_rect(bar.rect, EPS));
    }
    let longest = bars.iter().max_by(|a, b| a.rect.width.total_cmp(&b.rect.width)).expect("bars");
    assert_eq!(longest.label, "oslo");
    assert!(bars[0].rect.y < bars[1].rect.y && bars[1].rect.y < bars[2].rect.y);
}

#[test]
fn temporal_line_orders_dates_and_values() {
    let dataset = DataSet::from_rows(vec![
        Row::new().with("day", "2024-01-01").with("value", 3.0),
        Row::new().with("day", "2024-02-01").with("value", 5.0),
    ]);
    let fields = FieldSelection::single("day", "value").expect("fields");
    let document = ChartDocument::new(ChartKind::Line, fields)
        .with_x_axis(AxisConfig::category_x().with_scale_kind(ScaleKind::Temporal))
        .with_legend(LegendConfig::hidden());

    let scene = build_scene(&document, &dataset, Viewport::new(400, 300), &BuiltinPalettes)
        .expect("scene");
    assert_eq!(scene.x_scale.as_ref().map(|scale| scale.kind()), Some(ScaleKind::Temporal));

    let points = points(&scene);
    assert_eq!(points.len(), 2);
    assert!(points[0].0 < points[1].0);
    assert!(points[0].1 > points[1].1);

    let inner = scene.layout.inner_rect();
    for (x, y) in points {
        assert!(x >= inner.x - EPS && x <= inner.right() + EPS);
        assert!(y >= inner.y - EPS && y <= inner.bottom() + EPS);
    }
}

#[test]
fn every_chart_kind_builds_and_renders() {
    let dataset = sales();
    let kinds = [
        ChartKind::Line,
        ChartKind::Scatter,
        ChartKind::Bar,
        ChartKind::DivergingBar,
        ChartKind::Pie,
        ChartKind::Donut,
        ChartKind::PolarArea,
        ChartKind::RadialBar,
        ChartKind::Treemap,
    ];
    for kind in kinds {
        let label = if kind == ChartKind::Scatter { "target" } else { "city" };
        let fields = FieldSelection::single(label, "sales").expect("fields");
        let document = ChartDocument::new(kind, fields);
        let scene = scene_for(&document, &dataset);

        assert!(!scene.marks.is_empty(), "{kind:?} produced no marks");
        assert_eq!(scene.x_scale.is_some(), kind.is_cartesian(), "{kind:?}");
        assert_eq!(scene.axes.is_empty(), !kind.is_cartesian(), "{kind:?}");
        assert!(scene.legend.is_some(), "{kind:?}");

        let mut renderer = NullRenderer::default();
        renderer.render(&scene.to_render_frame()).expect("valid frame");
        assert_eq!(renderer.frames_rendered, 1);
        assert!(renderer.last_primitive_count > 0);
    }
}

#[test]
fn bars_are_centred_on_their_axis_ticks() {
    let fields = FieldSelection::new("city", ["sales", "target"]).expect("fields");
    let document = ChartDocument::new(ChartKind::Bar, fields);
    let scene = scene_for(&document, &sales());

    let x_axis = scene.axes.iter().find(|axis| axis.edge.is_horizontal()).expect("x axis");
    let inner = scene.layout.inner_rect();
    let bars = bars(&scene);
    // The null target on the last row produces no bar.
    assert_eq!(bars.len(), 7);

    for tick in &x_axis.ticks {
        let group: Vec<_> = bars.iter().filter(|bar| bar.label == tick.tick.label).collect();
        assert!(!group.is_empty());
        let left = group.iter().map(|bar| bar.rect.x).fold(f64::INFINITY, f64::min);
        assert!(left <= tick.tick.position);
        for bar in &group {
            assert!(inner.contains_rect(bar.rect, EPS));
        }
    }

    let legend = scene.legend.as_ref().expect("legend");
    for entry in &legend.entries {
        assert_eq!(entry.color, scene.colors.color_for(&entry.label));
    }
    assert_eq!(legend.entries.len(), 2);
}

#[test]
fn horizontal_bars_put_categories_on_the_y_axis() {
    let fields = FieldSelection::single("city", "sales").expect("fields");
    let document = ChartDocument::new(ChartKind::Bar, fields).with_bar(BarSettings {
        orientation: BarOrientation::Horizontal,
        ..BarSettings::default()
    });
    assert_eq!(document.x_axis.scale_kind, ScaleKind::Linear);
    assert_eq!(document.y_axis.scale_kind, ScaleKind::OrdinalBand);
    assert_eq!(document.x_axis.placement, AxisPlacement::Bottom);

    let scene = scene_for(&document, &positive_sales());
    assert_one_horizontal_bar_per_row(&scene);
}

#[test]
fn horizontal_orientation_set_in_place_still_draws_bars() {
    let fields = FieldSelection::single("city", "sales").expect("fields");
    let mut document = ChartDocument::new(ChartKind::Bar, fields);
    document.bar.orientation = BarOrientation::Horizontal;
    assert_eq!(document.x_axis.scale_kind, ScaleKind::OrdinalBand);

    let scene = scene_for(&document, &positive_sales());
    assert_one_horizontal_bar_per_row(&scene);
}

#[test]
fn axis_across_its_direction_is_rejected() {
    let fields = FieldSelection::single("city", "sales").expect("fields");
    let sideways_x = ChartDocument::new(ChartKind::Bar, fields.clone())
        .with_x_axis(AxisConfig::category_x().with_placement(AxisPlacement::Left));
    let err = build_scene(&sideways_x, &sales(), Viewport::new(400, 300), &BuiltinPalettes)
        .expect_err("x axis on the left must fail");
    assert!(matches!(err, ChartError::InvalidAxisPlacement(_)));

    let flat_y = ChartDocument::new(ChartKind::Line, fields.clone())
        .with_y_axis(AxisConfig::value_y().with_placement(AxisPlacement::Top));
    assert!(matches!(flat_y.validate(), Err(ChartError::InvalidAxisPlacement(_))));

    let hidden = ChartDocument::new(ChartKind::Bar, fields.clone())
        .with_x_axis(AxisConfig::hidden())
        .with_y_axis(AxisConfig::value_y().with_placement(AxisPlacement::Right));
    assert!(hidden.validate().is_ok());
    assert!(!scene_for(&hidden, &sales()).marks.is_empty());

    let pie = ChartDocument::new(ChartKind::Pie, fields)
        .with_x_axis(AxisConfig::category_x().with_placement(AxisPlacement::Left));
    assert!(pie.validate().is_ok());
}

#[test]
fn diverging_bars_follow_the_sorted_category_axis() {
    let fields = FieldSelection::single("city", "sales").expect("fields");
    let mut document = ChartDocument::new(ChartKind::DivergingBar, fields);
    document.diverging.sort_mode = SortMode::Descending;
    let scene = scene_for(&document, &sales());

    let y_scale = scene.y_scale.as_ref().expect("y scale");
    let categories: Vec<&str> = y_scale
        .categories()
        .expect("ordinal y scale")
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(categories, vec!["oslo", "rome", "kyiv", "bergen"]);

    let x_scale = scene.x_scale.as_ref().expect("x scale");
    let zero = x_scale.map_number(0.0).expect("zero maps");
    for mark in &scene.marks {
        let MarkGeometry::Bar(bar) = mark else {
            panic!("diverging charts only produce bars");
        };
        if bar.value < 0.0 {
            assert_relative_eq!(bar.rect.right(), zero, epsilon = EPS);
        } else {
            assert_relative_eq!(bar.rect.x, zero, epsilon = EPS);
        }
    }
}

#[test]
fn grouped_treemap_colours_leaves_by_group() {
    let fields = FieldSelection::single("city", "target").expect("fields");
    let document = ChartDocument::new(ChartKind::Treemap, fields).with_treemap(TreemapSettings {
        group_field: Some("region".to_owned()),
        ..TreemapSettings::default()
    });
    let scene = scene_for(&document, &sales());

    let keys: Vec<&str> = scene.colors.iter().map(|(key, _)| key).collect();
    assert_eq!(keys, vec!["north", "south", "east"]);
    let inner = scene.layout.inner_rect();
    for mark in &scene.marks {
        let MarkGeometry::TreemapCell(cell) = mark else {
            panic!("treemaps only produce cells");
        };
        assert!(inner.contains_rect(cell.rect, EPS));
        if cell.is_leaf {
            assert!(cell.parent.is_some());
        }
    }
}

#[test]
fn missing_fields_degrade_to_an_empty_scene() {
    let fields = FieldSelection::single("city", "revenue").expect("fields");
    let document = ChartDocument::new(ChartKind::Bar, fields);
    let scene = scene_for(&document, &sales());
    assert!(scene.marks.is_empty());
    assert_eq!(scene.axes.len(), 2);
}

#[test]
fn zero_sized_viewport_is_rejected() {
    let fields = FieldSelection::single("city", "sales").expect("fields");
    let document = ChartDocument::new(ChartKind::Bar, fields);
    let err = build_scene(&document, &sales(), Viewport::new(0, 300), &BuiltinPalettes)
        .expect_err("zero width must fail");
    assert!(matches!(err, ChartError::InvalidViewport { width: 0, height: 300 }));
}

#[test]
fn engine_renders_through_its_renderer() {
    let fields = FieldSelection::single("city", "sales").expect("fields");
    let config = ChartEngineConfig::new(Viewport::new(640, 480), ChartDocument::new(ChartKind::Pie, fields));
    let mut engine = ChartEngine::new(NullRenderer::default(), config).expect("engine");
    engine.set_data(sales().rows().to_vec());
    engine.render().expect("render");
    engine.update_document(|document| document.kind = ChartKind::Donut);
    engine.render().expect("render");

    assert_eq!(engine.document().kind, ChartKind::Donut);
    assert_eq!(engine.renderer().frames_rendered, 2);
    assert!(engine.renderer().last_primitive_count > 0);

    let err = engine.set_viewport(Viewport::new(640, 0)).expect_err("invalid viewport");
    assert!(matches!(err, ChartError::InvalidViewport { .. }));
    assert_eq!(engine.viewport(), Viewport::new(640, 480));
}

#[test]
fn engine_rejects_invalid_initial_viewport() {
    let fields = FieldSelection::single("city", "sales").expect("fields");
    let config = ChartEngineConfig::new(Viewport::new(0, 0), ChartDocument::new(ChartKind::Bar, fields));
    assert!(matches!(
        ChartEngine::new(NullRenderer::default(), config),
        Err(ChartError::InvalidViewport { width: 0, height: 0 })
    ));
}
