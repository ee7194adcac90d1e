#![forbid(unsafe_code)]

//! Content bounding boxes and deterministic shape extents.
//!
//! The browser computes content extents from layout (`getBBox()`); this crate
//! is host-agnostic, so extents are computed in closed form from shape
//! geometry instead. Tags whose extent depends on font metrics or path
//! interpolation (`text`, `path`) contribute nothing to the content box.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in surface-local coordinates.
///
/// Field names match the host-visible `boundingBox` property.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BBox {
    /// Box spanning the two corner points, in any order.
    #[must_use]
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let x = x1.min(x2);
        let y = y1.min(y2);
        Self {
            x,
            y,
            width: x1.max(x2) - x,
            height: y1.max(y2) - y,
        }
    }

    /// True when the box has no positive area (zero width or height).
    #[must_use]
    pub fn is_degenerate(self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Smallest box covering both `self` and `other`.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        Self {
            x,
            y,
            width: right - x,
            height: bottom - y,
        }
    }

    /// The `viewBox` attribute string for this box: `"x y width height"`.
    ///
    /// Values use natural numeric formatting (`1`, not `1.0`).
    #[must_use]
    pub fn to_view_box(self) -> String {
        format!("{} {} {} {}", self.x, self.y, self.width, self.height)
    }
}

fn attr_number(attrs: &BTreeMap<String, String>, name: &str) -> Option<f64> {
    attrs.get(name)?.trim().parse().ok()
}

fn attr_number_or_zero(attrs: &BTreeMap<String, String>, name: &str) -> f64 {
    attr_number(attrs, name).unwrap_or(0.0)
}

fn points_extent(points: &str) -> Option<BBox> {
    let mut coords = points
        .split(|ch: char| ch.is_whitespace() || ch == ',')
        .filter(|token| !token.is_empty())
        .map(str::parse::<f64>);

    let mut bbox: Option<BBox> = None;
    while let Some(x) = coords.next() {
        let x = x.ok()?;
        let y = coords.next()?.ok()?;
        let point = BBox {
            x,
            y,
            width: 0.0,
            height: 0.0,
        };
        bbox = Some(match bbox {
            Some(prior) => prior.union(point),
            None => point,
        });
    }
    bbox
}

/// Closed-form extent of a shape element, or `None` when the tag has no
/// deterministic extent (`text`, `path`, unknown tags).
#[must_use]
pub fn shape_extent(tag: &str, attrs: &BTreeMap<String, String>) -> Option<BBox> {
    match tag {
        "rect" => Some(BBox {
            x: attr_number_or_zero(attrs, "x"),
            y: attr_number_or_zero(attrs, "y"),
            width: attr_number_or_zero(attrs, "width"),
            height: attr_number_or_zero(attrs, "height"),
        }),
        "circle" => {
            let cx = attr_number_or_zero(attrs, "cx");
            let cy = attr_number_or_zero(attrs, "cy");
            let r = attr_number_or_zero(attrs, "r");
            Some(BBox {
                x: cx - r,
                y: cy - r,
                width: 2.0 * r,
                height: 2.0 * r,
            })
        }
        "ellipse" => {
            let cx = attr_number_or_zero(attrs, "cx");
            let cy = attr_number_or_zero(attrs, "cy");
            let rx = attr_number_or_zero(attrs, "rx");
            let ry = attr_number_or_zero(attrs, "ry");
            Some(BBox {
                x: cx - rx,
                y: cy - ry,
                width: 2.0 * rx,
                height: 2.0 * ry,
            })
        }
        "line" => Some(BBox::from_corners(
            attr_number_or_zero(attrs, "x1"),
            attr_number_or_zero(attrs, "y1"),
            attr_number_or_zero(attrs, "x2"),
            attr_number_or_zero(attrs, "y2"),
        )),
        "polyline" | "polygon" => points_extent(attrs.get("points")?),
        _ => None,
    }
}
