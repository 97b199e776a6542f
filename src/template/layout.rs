//! Placing the flattened net on the page.

use spade::{DelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation};

use crate::error::{GeometryError, Result};
use crate::math::transform::{rotation_z, transform_point, translation};
use crate::math::{angle_between, Matrix4, Point2, Point3, Vector2, Vector3, EPSILON, TOLERANCE};
use crate::params::{Scaling, TemplateParams};
use crate::topology::Topology;

/// Net-to-page placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    /// Maps flattened net coordinates onto the page.
    pub transform: Matrix4,
    pub width: f64,
    pub height: f64,
    /// Page units per net unit.
    pub scale: f64,
}

/// Model-unit measures of the assembled solid that a [`Scaling`] can
/// refer to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidSize {
    pub edge_length: f64,
    pub inscribed_radius: f64,
    pub circumscribed_radius: f64,
}

impl SolidSize {
    /// Measures `topology` about the origin, using its first edge.
    #[must_use]
    pub fn of(topology: &Topology) -> Self {
        Self {
            edge_length: topology.edges().first().map_or(0.0, |e| e.segment.length()),
            inscribed_radius: topology.face_radius(),
            circumscribed_radius: topology
                .vertices()
                .iter()
                .map(|v| v.coords.norm())
                .fold(0.0, f64::max),
        }
    }
}

/// Convex hull of `points` in the XY plane.
///
/// Falls back to the input points when they do not span an area.
///
/// # Errors
///
/// Returns [`GeometryError::Degenerate`] for non-finite coordinates.
pub fn unfolded_hull(points: &[Point3]) -> Result<Vec<Point3>> {
    let mut triangulation: DelaunayTriangulation<SpadePoint2<f64>> = DelaunayTriangulation::new();
    for p in points {
        triangulation
            .insert(SpadePoint2::new(p.x, p.y))
            .map_err(|e: InsertionError| GeometryError::Degenerate(format!("hull insert: {e}")))?;
    }

    let hull: Vec<Point3> = triangulation
        .convex_hull()
        .map(|edge| {
            let p = edge.from().position();
            Point3::new(p.x, p.y, 0.0)
        })
        .collect();
    if hull.len() < 3 {
        return Ok(points.to_vec());
    }
    Ok(hull)
}

/// Rotation about Z that puts the longest edge of the closed polygon
/// `hull` along the X axis.
#[must_use]
pub fn orientation(hull: &[Point3]) -> Matrix4 {
    let longest = hull
        .iter()
        .zip(hull.iter().cycle().skip(1))
        .map(|(a, b)| Vector3::new(b.x - a.x, b.y - a.y, 0.0))
        .max_by(|a, b| a.norm_squared().total_cmp(&b.norm_squared()));
    let Some(longest) = longest else {
        return Matrix4::identity();
    };
    let Some(angle) = angle_between(&longest, &Vector3::x()) else {
        return Matrix4::identity();
    };
    if longest.cross(&Vector3::x()).z > EPSILON {
        rotation_z(angle)
    } else {
        rotation_z(-angle)
    }
}

/// Axis-aligned `(min, max)` corners of `points`.
fn bounds(points: &[Point3]) -> Option<(Point2, Point2)> {
    let first = points.first()?;
    Some(points.iter().fold(
        (Point2::new(first.x, first.y), Point2::new(first.x, first.y)),
        |(min, max), p| {
            (
                Point2::new(min.x.min(p.x), min.y.min(p.y)),
                Point2::new(max.x.max(p.x), max.y.max(p.y)),
            )
        },
    ))
}

/// Orients the net points, moves them into the positive quadrant behind a
/// margin of `padding_factor` tab heights, and scales them as
/// `params.scaling` asks.
///
/// The tab height is measured on `size.edge_length`.
///
/// # Errors
///
/// Returns [`GeometryError::Degenerate`] if there are no points, the
/// padded net has no width, or the measure being scaled is zero.
pub fn page_layout(
    points: &[Point3],
    size: &SolidSize,
    params: &TemplateParams,
) -> Result<PageLayout> {
    let hull = unfolded_hull(points)?;
    let orient = orientation(&hull);
    let oriented: Vec<Point3> = hull.iter().map(|p| transform_point(&orient, p)).collect();
    let (min, max) = bounds(&oriented)
        .ok_or_else(|| GeometryError::Degenerate("no points to lay out".to_string()))?;

    let padding = size.edge_length * params.tab_scale * params.padding_factor;
    let padded = (max - min) + Vector2::repeat(2.0 * padding);
    if padded.x < TOLERANCE {
        return Err(GeometryError::Degenerate("net has no width".to_string()).into());
    }
    let (target, measured) = match params.scaling {
        Scaling::PageWidth(width) => (width, padded.x),
        Scaling::PageHeight(height) => (height, padded.y),
        Scaling::EdgeLength(length) => (length, size.edge_length),
        Scaling::InscribedRadius(radius) => (radius, size.inscribed_radius),
        Scaling::CircumscribedRadius(radius) => (radius, size.circumscribed_radius),
    };
    if measured < TOLERANCE {
        let reason = format!("cannot scale to {:?}", params.scaling);
        return Err(GeometryError::Degenerate(reason).into());
    }
    let scale = target / measured;

    let offset = Vector3::new(padding - min.x, padding - min.y, 0.0);
    let transform = Matrix4::new_nonuniform_scaling(&Vector3::new(scale, scale, 1.0))
        * translation(&offset)
        * orient;

    Ok(PageLayout {
        transform,
        width: padded.x * scale,
        height: padded.y * scale,
        scale,
    })
}
