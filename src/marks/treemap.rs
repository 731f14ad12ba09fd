//! Hierarchical rectangle partitioning.
//!
//! A tiling method is a pure function from a rectangle and child weights to
//! child rectangles. Areas are proportional to weight and, for a positive
//! total weight, the children cover the parent exactly. Padding is applied
//! afterwards by [`position_treemap`].

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::core::{Rect, Row};
use crate::error::{ChartError, ChartResult};

/// Squarify target aspect ratio.
pub const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TilingMethod {
    /// Recursive halving by weight along the longer side.
    Binary,
    #[default]
    Squarify,
    /// Children stacked top to bottom, each spanning the full width.
    Slice,
    /// Children placed left to right, each spanning the full height.
    Dice,
    /// Dice at even depths, slice at odd depths.
    SliceDice,
}

impl TilingMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Squarify => "squarify",
            Self::Slice => "slice",
            Self::Dice => "dice",
            Self::SliceDice => "slice-dice",
        }
    }
}

impl fmt::Display for TilingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TilingMethod {
    type Err = ChartError;

    fn from_str(value: &str) -> ChartResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "binary" => Ok(Self::Binary),
            "squarify" | "squarified" => Ok(Self::Squarify),
            "slice" => Ok(Self::Slice),
            "dice" => Ok(Self::Dice),
            "slice-dice" | "slice_dice" | "slicedice" => Ok(Self::SliceDice),
            _ => Err(ChartError::UnknownTilingMethod(value.to_owned())),
        }
    }
}

/// Weighted tree consumed by [`position_treemap`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub label: String,
    /// Leaf weight, or the sum of the children's weights.
    pub weight: f64,
    pub row_index: Option<usize>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Negative and non-finite weights count as zero.
    #[must_use]
    pub fn leaf(label: impl Into<String>, weight: f64, row_index: Option<usize>) -> Self {
        Self {
            label: label.into(),
            weight: sanitize_weight(weight),
            row_index,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn group(label: impl Into<String>, children: Vec<TreeNode>) -> Self {
        let weight = children.iter().map(|child| child.weight).sum();
        Self {
            label: label.into(),
            weight,
            row_index: None,
            children,
        }
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[must_use]
    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(Self::leaf_count).sum()
        }
    }
}

fn sanitize_weight(weight: f64) -> f64 {
    if weight.is_finite() { weight.max(0.0) } else { 0.0 }
}

/// Builds a one- or two-level tree from rows.
///
/// Without `group_field` every row becomes a leaf of the root. With it,
/// rows sharing a group key are nested under one internal node, in
/// first-seen order.
#[must_use]
pub fn build_tree(rows: &[Row], label_field: &str, value_field: &str, group_field: Option<&str>) -> TreeNode {
    let leaf = |(row_index, row): (usize, &Row)| {
        TreeNode::leaf(
            row.get(label_field).to_string(),
            row.number(value_field).unwrap_or(0.0),
            Some(row_index),
        )
    };

    let Some(group_field) = group_field else {
        return TreeNode::group("root", rows.iter().enumerate().map(leaf).collect());
    };

    let mut groups: IndexMap<String, Vec<TreeNode>> = IndexMap::new();
    for (row_index, row) in rows.iter().enumerate() {
        let key = row.get(group_field).as_key().unwrap_or_default();
        groups.entry(key).or_default().push(leaf((row_index, row)));
    }
    TreeNode::group(
        "root",
        groups
            .into_iter()
            .map(|(key, children)| TreeNode::group(key, children))
            .collect(),
    )
}

/// Partitions `rect` among `weights` using `method`.
///
/// `depth` is the depth of the parent being tiled, used by
/// [`TilingMethod::SliceDice`].
#[must_use]
pub fn tile(method: TilingMethod, rect: Rect, weights: &[f64], depth: usize) -> Vec<Rect> {
    let weights: Vec<f64> = weights.iter().copied().map(sanitize_weight).collect();
    match method {
        TilingMethod::Slice => slice(rect, &weights),
        TilingMethod::Dice => dice(rect, &weights),
        TilingMethod::SliceDice if depth % 2 == 1 => slice(rect, &weights),
        TilingMethod::SliceDice => dice(rect, &weights),
        TilingMethod::Binary => binary(rect, &weights),
        TilingMethod::Squarify => squarify(rect, &weights, GOLDEN_RATIO),
    }
}

fn dice(rect: Rect, weights: &[f64]) -> Vec<Rect> {
    let total: f64 = weights.iter().sum();
    let mut rects = Vec::with_capacity(weights.len());
    let mut cumulative = 0.0;
    let mut x0 = rect.x;
    for (index, weight) in weights.iter().enumerate() {
        cumulative += weight;
        let x1 = if total <= 0.0 {
            rect.x
        } else if index + 1 == weights.len() {
            rect.right()
        } else {
            rect.x + rect.width * cumulative / total
        };
        rects.push(Rect::new(x0, rect.y, (x1 - x0).max(0.0), rect.height));
        x0 = x1;
    }
    rects
}

fn slice(rect: Rect, weights: &[f64]) -> Vec<Rect> {
    let total: f64 = weights.iter().sum();
    let mut rects = Vec::with_capacity(weights.len());
    let mut cumulative = 0.0;
    let mut y0 = rect.y;
    for (index, weight) in weights.iter().enumerate() {
        cumulative += weight;
        let y1 = if total <= 0.0 {
            rect.y
        } else if index + 1 == weights.len() {
            rect.bottom()
        } else {
            rect.y + rect.height * cumulative / total
        };
        rects.push(Rect::new(rect.x, y0, rect.width, (y1 - y0).max(0.0)));
        y0 = y1;
    }
    rects
}

fn binary(rect: Rect, weights: &[f64]) -> Vec<Rect> {
    let count = weights.len();
    let mut rects = vec![Rect::new(rect.x, rect.y, 0.0, 0.0); count];
    if count == 0 {
        return rects;
    }

    let mut sums = Vec::with_capacity(count + 1);
    sums.push(0.0);
    for weight in weights {
        let last = sums[sums.len() - 1];
        sums.push(last + weight);
    }
    if sums[count] <= 0.0 {
        return rects;
    }

    let mut stack: SmallVec<[(usize, usize, Rect); 16]> = SmallVec::new();
    stack.push((0, count, rect));
    while let Some((start, end, area)) = stack.pop() {
        if end - start == 1 {
            rects[start] = area;
            continue;
        }
        let value = sums[end] - sums[start];
        let target = sums[start] + value * 0.5;

        // First split index whose prefix sum reaches half of the range.
        let mut split = start + 1;
        let mut high = end;
        while split < high {
            let mid = (split + high) / 2;
            if sums[mid] < target {
                split = mid + 1;
            } else {
                high = mid;
            }
        }
        if split > start + 1 && target - sums[split - 1] < sums[split] - target {
            split -= 1;
        }
        let split = split.clamp(start + 1, end - 1);

        let left_value = sums[split] - sums[start];
        let share = if value > 0.0 { left_value / value } else { 0.5 };
        let (left, right) = if area.width > area.height {
            let width = area.width * share;
            (
                Rect::new(area.x, area.y, width, area.height),
                Rect::new(area.x + width, area.y, area.width - width, area.height),
            )
        } else {
            let height = area.height * share;
            (
                Rect::new(area.x, area.y, area.width, height),
                Rect::new(area.x, area.y + height, area.width, area.height - height),
            )
        };
        stack.push((split, end, right));
        stack.push((start, split, left));
    }
    rects
}

fn squarify(rect: Rect, weights: &[f64], ratio: f64) -> Vec<Rect> {
    let count = weights.len();
    let mut total: f64 = weights.iter().sum();
    if total <= 0.0 || rect.width <= 0.0 || rect.height <= 0.0 {
        return dice(rect, weights);
    }

    let mut rects = Vec::with_capacity(count);
    let (mut x0, mut y0) = (rect.x, rect.y);
    let (x1, y1) = (rect.right(), rect.bottom());
    let mut row_start = 0;

    while row_start < count {
        let (dx, dy) = (x1 - x0, y1 - y0);

        // Seed the row with the next non-empty child.
        let mut row_end = row_start;
        let mut row_sum = 0.0;
        while row_end < count {
            row_sum = weights[row_end];
            row_end += 1;
            if row_sum > 0.0 {
                break;
            }
        }
        let mut min_value = row_sum;
        let mut max_value = row_sum;
        let alpha = (dy / dx).max(dx / dy) / (total * ratio);
        let mut beta = row_sum * row_sum * alpha;
        let mut min_ratio = (max_value / beta).max(beta / min_value);

        while row_end < count {
            let value = weights[row_end];
            let candidate_sum = row_sum + value;
            let candidate_min = min_value.min(value);
            let candidate_max = max_value.max(value);
            beta = candidate_sum * candidate_sum * alpha;
            let next_ratio = (candidate_max / beta).max(beta / candidate_min);
            if next_ratio > min_ratio {
                break;
            }
            row_sum = candidate_sum;
            min_value = candidate_min;
            max_value = candidate_max;
            min_ratio = next_ratio;
            row_end += 1;
        }

        let row_weights = &weights[row_start..row_end];
        let last_row = row_end == count;
        if dx < dy {
            let row_bottom = if last_row || total <= 0.0 {
                y1
            } else {
                (y0 + dy * row_sum / total).min(y1)
            };
            rects.extend(dice(Rect::new(x0, y0, dx, row_bottom - y0), row_weights));
            y0 = row_bottom;
        } else {
            let row_right = if last_row || total <= 0.0 {
                x1
            } else {
                (x0 + dx * row_sum / total).min(x1)
            };
            rects.extend(slice(Rect::new(x0, y0, row_right - x0, dy), row_weights));
            x0 = row_right;
        }
        total -= row_sum;
        row_start = row_end;
    }
    rects
}

/// One positioned node of the treemap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreemapCell {
    pub label: String,
    /// Label of the enclosing group, if the node is nested.
    pub parent: Option<String>,
    pub depth: usize,
    pub weight: f64,
    pub row_index: Option<usize>,
    pub is_leaf: bool,
    pub rect: Rect,
}

impl TreemapCell {
    /// Grouped leaves share their group's colour.
    #[must_use]
    pub fn color_key(&self) -> &str {
        self.parent.as_deref().unwrap_or(&self.label)
    }
}

/// Lays out `root` inside `bounds`.
///
/// Internal nodes are inset by `padding_outer`; siblings are separated by
/// `padding_inner`. The root itself is not emitted. Cells come out in
/// depth-first order, parents before their children.
#[must_use]
pub fn position_treemap(
    root: &TreeNode,
    bounds: Rect,
    method: TilingMethod,
    padding_inner: f64,
    padding_outer: f64,
) -> Vec<TreemapCell> {
    let padding = Padding {
        inner_half: sanitize_weight(padding_inner) * 0.5,
        outer: sanitize_weight(padding_outer),
    };
    let mut cells = Vec::with_capacity(root.leaf_count() + root.children.len());
    layout_children(root, bounds, 0, None, method, padding, &mut cells);
    debug!(
        method = method.as_str(),
        cells = cells.len(),
        total_weight = root.weight,
        "positioned treemap"
    );
    cells
}

#[derive(Debug, Clone, Copy)]
struct Padding {
    inner_half: f64,
    outer: f64,
}

fn layout_children(
    node: &TreeNode,
    own: Rect,
    depth: usize,
    parent_label: Option<&str>,
    method: TilingMethod,
    padding: Padding,
    cells: &mut Vec<TreemapCell>,
) {
    if node.is_leaf() {
        return;
    }
    // Children are shrunk by half the inner padding on every side, so the
    // tiling area grows by the same amount to keep the outer gap exact.
    let area = adjust(own, padding.outer - padding.inner_half);
    let weights: Vec<f64> = node.children.iter().map(|child| child.weight).collect();
    let tiles = tile(method, area, &weights, depth);

    for (child, tile) in node.children.iter().zip(tiles) {
        // The grown tiling area can poke past `own` when the inner padding
        // exceeds twice the outer one; degenerate tiles would escape.
        let rect = adjust(tile, padding.inner_half).clamp_to(own);
        cells.push(TreemapCell {
            label: child.label.clone(),
            parent: parent_label.map(str::to_owned),
            depth: depth + 1,
            weight: child.weight,
            row_index: child.row_index,
            is_leaf: child.is_leaf(),
            rect,
        });
        layout_children(child, rect, depth + 1, Some(&child.label), method, padding, cells);
    }
}

/// Insets by `amount`, or grows when `amount` is negative.
fn adjust(rect: Rect, amount: f64) -> Rect {
    if amount >= 0.0 {
        rect.inset(amount)
    } else {
        let grow = -amount;
        Rect::new(
            rect.x - grow,
            rect.y - grow,
            rect.width + 2.0 * grow,
            rect.height + 2.0 * grow,
        )
    }
}
