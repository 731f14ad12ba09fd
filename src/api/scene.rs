//! Scene pipeline: rows + document + canvas size to positioned geometry.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{AxisConfig, ChartDocument, ChartKind};
use crate::core::{
    DataSet, FieldValue, PixelRange, Point, Rect, Row, Scale, ScaleKind, ScaleOptions, Viewport,
    create_scale,
};
use crate::error::{ChartError, ChartResult};
use crate::layout::{AxisLayoutInput, LayoutBox, LayoutTuning, compute_layout_tuned};
use crate::marks::{
    BarOrientation, MarkGeometry, PolarLayout, build_tree, ordered_labels, position_bars,
    position_diverging_bars, position_lines, position_pie, position_points, position_polar_area,
    position_radial_bars, position_treemap, sort_permutation, symmetric_domain,
};
use crate::render::{
    ArcPrimitive, AxisGeometry, CirclePrimitive, Color, ColorAssignment, LegendGeometry,
    PaletteSource, PolylinePrimitive, RectPrimitive, RenderFrame, build_axis, build_legend,
    resolve_palette,
};
use crate::telemetry::scene_span;

const POINT_RADIUS_PX: f64 = 3.0;
const LINE_STROKE_PX: f64 = 2.0;
const TREEMAP_GROUP_ALPHA: f64 = 0.15;
const TREEMAP_STROKE: Color = Color::rgb(1.0, 1.0, 1.0);

/// Everything positioned for one render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartScene {
    pub viewport: Viewport,
    pub layout: LayoutBox,
    pub x_scale: Option<Scale>,
    pub y_scale: Option<Scale>,
    pub marks: Vec<MarkGeometry>,
    pub colors: ColorAssignment,
    pub axes: Vec<AxisGeometry>,
    pub legend: Option<LegendGeometry>,
}

impl ChartScene {
    /// Flattens the scene into draw primitives: marks first, then axes,
    /// then the legend.
    #[must_use]
    pub fn to_render_frame(&self) -> RenderFrame {
        let mut frame = RenderFrame::new(self.viewport);
        for mark in &self.marks {
            let color = self.colors.color_for(mark.color_key());
            match mark {
                MarkGeometry::Point(point) => frame.circles.push(CirclePrimitive {
                    center: Point::new(point.x, point.y),
                    radius: POINT_RADIUS_PX,
                    fill: color,
                }),
                MarkGeometry::Bar(bar) => frame.rects.push(RectPrimitive::filled(bar.rect, color)),
                MarkGeometry::Line(path) => {
                    if path.len() >= 2 {
                        frame.polylines.push(PolylinePrimitive {
                            points: path.points.clone(),
                            stroke_width: LINE_STROKE_PX,
                            color,
                        });
                    }
                }
                MarkGeometry::Arc(arc) => {
                    if !arc.is_empty() {
                        frame.arcs.push(ArcPrimitive {
                            center: arc.center,
                            inner_radius: arc.inner_radius,
                            outer_radius: arc.outer_radius,
                            start_angle: arc.start_angle,
                            end_angle: arc.end_angle,
                            fill: color,
                        });
                    }
                }
                MarkGeometry::TreemapCell(cell) => {
                    let fill = if cell.is_leaf {
                        color
                    } else {
                        color.with_alpha(TREEMAP_GROUP_ALPHA)
                    };
                    frame
                        .rects
                        .push(RectPrimitive::filled(cell.rect, fill).with_stroke(TREEMAP_STROKE, 1.0));
                }
            }
        }
        for axis in &self.axes {
            axis.append_to_frame(&mut frame);
        }
        if let Some(legend) = &self.legend {
            legend.append_to_frame(&mut frame);
        }
        frame
    }
}

/// Builds the scene with default layout tuning.
pub fn build_scene(
    document: &ChartDocument,
    dataset: &DataSet,
    viewport: Viewport,
    palettes: &dyn PaletteSource,
) -> ChartResult<ChartScene> {
    build_scene_tuned(document, dataset, viewport, palettes, LayoutTuning::default())
}

/// Runs scale construction, layout, mark positioning and guide geometry.
///
/// Fails for a zero-size viewport or an axis placed on an edge across its
/// direction; data problems degrade to fewer marks or fallback scales.
pub fn build_scene_tuned(
    document: &ChartDocument,
    dataset: &DataSet,
    viewport: Viewport,
    palettes: &dyn PaletteSource,
    tuning: LayoutTuning,
) -> ChartResult<ChartScene> {
    if !viewport.is_valid() {
        return Err(ChartError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }
    document.validate()?;
    let span = scene_span(document.kind, dataset.len(), viewport);
    let _guard = span.enter();
    warn_missing_fields(document, dataset);

    let palette = resolve_palette(palettes, &document.palette_id);
    let scene = if document.kind.is_cartesian() {
        cartesian_scene(document, dataset, viewport, &palette, tuning)
    } else {
        radial_or_hierarchical_scene(document, dataset, viewport, &palette, tuning)
    };

    debug!(
        kind = ?document.kind,
        rows = dataset.len(),
        marks = scene.marks.len(),
        axes = scene.axes.len(),
        legend_entries = scene.legend.as_ref().map_or(0, |legend| legend.entries.len()),
        inner_width = scene.layout.inner_width,
        inner_height = scene.layout.inner_height,
        "built chart scene"
    );
    Ok(scene)
}

fn warn_missing_fields(document: &ChartDocument, dataset: &DataSet) {
    if dataset.is_empty() {
        return;
    }
    let fields = &document.fields;
    for field in std::iter::once(fields.label_field()).chain(fields.value_fields().iter().map(String::as_str)) {
        if !dataset.fields().iter().any(|known| known == field) {
            warn!(field, "selected field is absent from the data set");
        }
    }
}

/// What a cartesian axis scale has to encode for the chart kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisRole {
    /// Bar categories: needs bands (or dates).
    Category,
    /// Bar lengths: needs a continuous scale.
    Value,
    /// Line and scatter charts use the configured kind as is.
    Configured,
}

/// Scale inputs for one cartesian axis.
struct AxisPlan<'a> {
    config: &'a AxisConfig,
    kind: ScaleKind,
    values: Vec<FieldValue>,
    options: ScaleOptions,
    horizontal: bool,
}

impl<'a> AxisPlan<'a> {
    /// Resolves the scale kind for `role`. A document whose axis still
    /// carries the other orientation's kind (for instance a horizontal bar
    /// chart with column defaults) gets the kind the marks need instead.
    fn new(config: &'a AxisConfig, role: AxisRole, values: Vec<FieldValue>, horizontal: bool) -> Self {
        let configured = config.scale_kind;
        let (kind, options) = match role {
            AxisRole::Category
                if matches!(
                    configured,
                    ScaleKind::Linear | ScaleKind::Logarithmic | ScaleKind::SquareRoot
                ) =>
            {
                debug!(%configured, "category axis needs bands, using ordinal-band");
                (ScaleKind::OrdinalBand, config.scale_options())
            }
            AxisRole::Value if !configured.is_continuous() => {
                debug!(%configured, "value axis needs a continuous scale, using linear");
                (
                    ScaleKind::Linear,
                    config.scale_options().with_nice(true).with_force_zero(true),
                )
            }
            _ => (configured, config.scale_options()),
        };
        Self {
            config,
            kind,
            values,
            options,
            horizontal,
        }
    }

    fn range(&self, inner: Rect) -> PixelRange {
        if self.horizontal {
            PixelRange::new(inner.x, inner.right())
        } else if self.kind.is_continuous() {
            PixelRange::new(inner.bottom(), inner.y)
        } else {
            PixelRange::new(inner.y, inner.bottom())
        }
    }

    fn scale(&self, inner: Rect) -> Scale {
        create_scale(self.kind, &self.values, self.range(inner), &self.options)
    }

    /// Longest tick label the axis would show on a canvas-sized range.
    fn estimated_label_chars(&self, canvas: Rect) -> usize {
        let scale = self.scale(canvas);
        let count = self
            .config
            .tick_policy
            .target_count(scale.range().extent(), self.horizontal);
        scale
            .ticks(count)
            .iter()
            .map(|tick| tick.label.chars().count())
            .max()
            .unwrap_or(0)
    }
}

fn cartesian_scene(
    document: &ChartDocument,
    dataset: &DataSet,
    viewport: Viewport,
    palette: &[Color],
    tuning: LayoutTuning,
) -> ChartScene {
    let rows = dataset.rows();
    let fields = &document.fields;
    let primary = fields.primary_value_field();
    let labels_on_x = match document.kind {
        ChartKind::DivergingBar => false,
        ChartKind::Bar => document.bar.orientation == BarOrientation::Vertical,
        _ => true,
    };
    let (x_role, y_role) = match (document.kind, labels_on_x) {
        (ChartKind::Line | ChartKind::Scatter, _) => (AxisRole::Configured, AxisRole::Configured),
        (_, true) => (AxisRole::Category, AxisRole::Value),
        (_, false) => (AxisRole::Value, AxisRole::Category),
    };

    let order = match document.kind {
        ChartKind::DivergingBar => sort_permutation(rows, primary, document.diverging.sort_mode),
        _ => (0..rows.len()).collect(),
    };
    let label_values = ordered_labels(rows, fields.label_field(), &order);
    let value_values = dataset.columns(fields.value_fields());

    let (x_values, y_values) = if labels_on_x {
        (label_values, value_values)
    } else {
        (value_values, label_values)
    };
    let mut x_plan = AxisPlan::new(&document.x_axis, x_role, x_values, true);
    let mut y_plan = AxisPlan::new(&document.y_axis, y_role, y_values, false);

    if document.kind == ChartKind::DivergingBar && document.diverging.symmetric_domain {
        let (lo, hi) = symmetric_domain(rows, primary);
        let value_plan = if labels_on_x { &mut y_plan } else { &mut x_plan };
        value_plan.options = value_plan.options.with_domain_override(Some(lo), Some(hi));
    }

    let canvas = Rect::new(0.0, 0.0, viewport.width_px(), viewport.height_px());
    let axis_inputs = [
        AxisLayoutInput::new(&document.x_axis).with_label_chars(x_plan.estimated_label_chars(canvas)),
        AxisLayoutInput::new(&document.y_axis).with_label_chars(y_plan.estimated_label_chars(canvas)),
    ];
    let layout = compute_layout_tuned(viewport, &document.legend, &axis_inputs, tuning);
    let inner = layout.inner_rect();
    let x_scale = x_plan.scale(inner);
    let y_scale = y_plan.scale(inner);

    let mut marks: Vec<MarkGeometry> = Vec::new();
    match document.kind {
        ChartKind::Line => {
            marks.extend(position_lines(rows, fields, &x_scale, &y_scale).into_iter().map(MarkGeometry::from));
            marks.extend(position_points(rows, fields, &x_scale, &y_scale).into_iter().map(MarkGeometry::from));
        }
        ChartKind::Scatter => {
            marks.extend(position_points(rows, fields, &x_scale, &y_scale).into_iter().map(MarkGeometry::from));
        }
        ChartKind::DivergingBar => {
            marks.extend(
                position_diverging_bars(rows, fields, &order, &y_scale, &x_scale)
                    .into_iter()
                    .map(MarkGeometry::from),
            );
        }
        _ => {
            let (category, value, orientation) = if labels_on_x {
                (&x_scale, &y_scale, BarOrientation::Vertical)
            } else {
                (&y_scale, &x_scale, BarOrientation::Horizontal)
            };
            marks.extend(
                position_bars(rows, fields, category, value, orientation, document.bar.group_padding)
                    .into_iter()
                    .map(MarkGeometry::from),
            );
        }
    }

    let series_keys = fields.value_fields().iter().map(String::as_str);
    let colors = ColorAssignment::resolve(series_keys, palette, document.color_palette_extend);
    let totals: IndexMap<String, f64> = fields
        .value_fields()
        .iter()
        .map(|field| (field.clone(), rows.iter().filter_map(|row| row.number(field)).sum::<f64>()))
        .collect();

    let axes = [
        build_axis(&document.x_axis, &x_scale, &layout),
        build_axis(&document.y_axis, &y_scale, &layout),
    ]
    .into_iter()
    .flatten()
    .collect();
    let legend = build_legend(&document.legend, &layout, &colors, Some(&totals));

    ChartScene {
        viewport,
        layout,
        x_scale: Some(x_scale),
        y_scale: Some(y_scale),
        marks,
        colors,
        axes,
        legend,
    }
}

fn radial_or_hierarchical_scene(
    document: &ChartDocument,
    dataset: &DataSet,
    viewport: Viewport,
    palette: &[Color],
    tuning: LayoutTuning,
) -> ChartScene {
    let rows = dataset.rows();
    let label_field = document.fields.label_field();
    let value_field = document.fields.primary_value_field();
    let layout = compute_layout_tuned(viewport, &document.legend, &[], tuning);
    let inner = layout.inner_rect();

    let marks: Vec<MarkGeometry> = if document.kind == ChartKind::Treemap {
        let settings = &document.treemap;
        let tree = build_tree(rows, label_field, value_field, settings.group_field.as_deref());
        position_treemap(
            &tree,
            inner,
            settings.tiling,
            settings.padding_inner,
            settings.padding_outer,
        )
        .into_iter()
        .map(MarkGeometry::from)
        .collect()
    } else {
        let polar = &document.polar;
        let polar_layout = PolarLayout::new(
            inner,
            polar.inner_radius_ratio,
            polar.pad_angle_deg,
            polar.start_angle_deg,
        );
        let arcs = match document.kind {
            ChartKind::PolarArea => position_polar_area(rows, label_field, value_field, &polar_layout),
            ChartKind::RadialBar => position_radial_bars(rows, label_field, value_field, &polar_layout),
            _ => position_pie(rows, label_field, value_field, &polar_layout),
        };
        arcs.into_iter().map(MarkGeometry::from).collect()
    };

    let color_field = match (&document.treemap.group_field, document.kind) {
        (Some(group), ChartKind::Treemap) => group.as_str(),
        _ => label_field,
    };
    let totals = category_totals(rows, color_field, value_field);
    let colors = ColorAssignment::resolve(
        totals.keys().map(String::as_str),
        palette,
        document.color_palette_extend,
    );
    let legend = build_legend(&document.legend, &layout, &colors, Some(&totals));

    ChartScene {
        viewport,
        layout,
        x_scale: None,
        y_scale: None,
        marks,
        colors,
        axes: Vec::new(),
        legend,
    }
}

/// Sum of `value_field` per distinct key of `key_field`, in first-seen
/// order. Rows without a key are skipped.
fn category_totals(rows: &[Row], key_field: &str, value_field: &str) -> IndexMap<String, f64> {
    let mut totals: IndexMap<String, f64> = IndexMap::new();
    for row in rows {
        let Some(key) = row.get(key_field).as_key() else {
            continue;
        };
        let value = row.number(value_field).filter(|value| value.is_finite()).unwrap_or(0.0);
        *totals.entry(key).or_insert(0.0) += value;
    }
    totals
}
