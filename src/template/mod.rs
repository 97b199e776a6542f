//! The printable net: page-space cut and fold lines, glue tabs, and the
//! projected sky laid out on the unfolded polygons.

mod clip;
mod layout;
mod tab;

pub use clip::{clip_path_to_tab, clip_point_to_tab, clip_segment_to_tab};
pub use layout::{orientation, page_layout, unfolded_hull, PageLayout, SolidSize};
pub use tab::{generate_tabs, overlapping_tabs, tab_angle, Tab, TabMaker};

use tracing::debug;

use crate::error::Result;
use crate::geometry::{CurvePath, Segment};
use crate::math::transform::transform_point;
use crate::math::{Matrix4, Point3};
use crate::params::TemplateParams;
use crate::projection::ProjectedSky;
use crate::topology::{PolygonId, Topology};
use crate::unfold::UnfoldTree;

/// A star outline piece on the page. Copies moved onto a tab carry the
/// tab's polygon.
#[derive(Debug, Clone)]
pub struct PagePath {
    pub polygon: PolygonId,
    pub path: CurvePath,
}

#[derive(Debug, Clone, Copy)]
pub struct PagePoint {
    pub polygon: PolygonId,
    pub star: u32,
    pub point: Point3,
}

#[derive(Debug, Clone, Copy)]
pub struct PageSegment {
    pub polygon: PolygonId,
    pub segment: Segment,
}

/// Where to print a polygon's number.
#[derive(Debug, Clone, Copy)]
pub struct Label {
    pub polygon: PolygonId,
    pub position: Point3,
}

/// Everything needed to draw the net. All coordinates are page units with
/// the origin at a corner and the page spanning `width` × `height`.
#[derive(Debug, Clone)]
pub struct Template {
    pub width: f64,
    pub height: f64,
    /// Page units per model unit.
    pub scale: f64,
    /// Model-to-page transform per polygon.
    pub transforms: Vec<Matrix4>,
    pub cuts: Vec<Segment>,
    /// Net folds and the hinge lines of tabs.
    pub folds: Vec<Segment>,
    pub tabs: Vec<Tab>,
    pub star_paths: Vec<PagePath>,
    pub star_points: Vec<PagePoint>,
    pub asterism_lines: Vec<PageSegment>,
    pub labels: Vec<Label>,
}

/// Lays out an unfolded net and a projected sky on the page.
#[derive(Debug, Clone, Copy)]
pub struct BuildTemplate<'a> {
    tree: &'a UnfoldTree,
    sky: &'a ProjectedSky,
    params: TemplateParams,
}

impl<'a> BuildTemplate<'a> {
    #[must_use]
    pub fn new(tree: &'a UnfoldTree, sky: &'a ProjectedSky, params: TemplateParams) -> Self {
        Self { tree, sky, params }
    }

    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`](crate::error::GeometryError::Degenerate)
    /// if the flattened net cannot be laid out.
    pub fn execute(&self, topology: &Topology) -> Result<Template> {
        let flat = self.tree.flatten(topology);
        let points: Vec<Point3> = topology
            .polygons()
            .iter()
            .flat_map(|polygon| {
                let m = &flat[polygon.id.index()];
                polygon
                    .vertices
                    .iter()
                    .map(move |&v| transform_point(m, &topology.vertices()[v]))
            })
            .collect();
        let layout = page_layout(&points, &SolidSize::of(topology), &self.params)?;

        let transforms: Vec<Matrix4> = flat.iter().map(|m| layout.transform * m).collect();
        let tabs = generate_tabs(topology, self.tree, &transforms, self.params.tab_scale);

        let mut template = Template {
            width: layout.width,
            height: layout.height,
            scale: layout.scale,
            transforms,
            cuts: Vec::new(),
            folds: Vec::new(),
            tabs,
            star_paths: Vec::new(),
            star_points: Vec::new(),
            asterism_lines: Vec::new(),
            labels: Vec::new(),
        };
        template.draw_edges(topology, self.tree);
        template.place_sky(topology, self.sky);
        template.labels = topology
            .polygons()
            .iter()
            .map(|polygon| {
                let transform = &template.transforms[polygon.id.index()];
                Label {
                    polygon: polygon.id,
                    position: transform_point(transform, &polygon.center),
                }
            })
            .collect();

        debug!(
            width = template.width,
            height = template.height,
            cuts = template.cuts.len(),
            folds = template.folds.len(),
            tabs = template.tabs.len(),
            star_paths = template.star_paths.len(),
            "built template"
        );
        Ok(template)
    }
}

impl Template {
    /// Net folds come from each polygon's entry edge. A cut edge is drawn
    /// as a fold on the side that carries its tab.
    fn draw_edges(&mut self, topology: &Topology, tree: &UnfoldTree) {
        for polygon in topology.polygons() {
            let transform = &self.transforms[polygon.id.index()];
            let entry = tree
                .node_for_polygon(polygon.id)
                .and_then(|id| tree.node(id))
                .filter(|node| node.parent.is_some())
                .map(|node| node.edge);
            if let Some(edge) = entry {
                self.folds.push(topology.edge(edge).segment.transformed(transform));
            }

            for cut in tree.cut_edges(topology, polygon.id) {
                let segment = topology.edge(cut).segment.transformed(transform);
                let has_tab = self
                    .tabs
                    .iter()
                    .any(|tab| tab.edge == cut && tab.polygon == polygon.id);
                if has_tab {
                    self.folds.push(segment);
                } else {
                    self.cuts.push(segment);
                }
            }
        }
    }

    /// Moves stars and asterism lines onto the page, copying whatever a
    /// tab will cover onto that tab.
    fn place_sky(&mut self, topology: &Topology, sky: &ProjectedSky) {
        for star in &sky.stars {
            let polygon = star.point.polygon;
            let point = transform_point(&self.transforms[polygon.index()], &star.point.point);
            self.star_points.push(PagePoint {
                polygon,
                star: star.star.id,
                point,
            });
            for tab in overlapping_tabs(topology, &self.tabs, polygon) {
                if let Some(point) = clip_point_to_tab(&point, tab) {
                    self.star_points.push(PagePoint {
                        polygon: tab.polygon,
                        star: star.star.id,
                        point,
                    });
                }
            }

            for outline in &star.outline {
                let transform = &self.transforms[outline.polygon.index()];
                for path in outline.path.transformed(transform).split_continuous() {
                    for tab in overlapping_tabs(topology, &self.tabs, outline.polygon) {
                        self.star_paths.extend(clip_path_to_tab(&path, tab).into_iter().map(|path| {
                            PagePath {
                                polygon: tab.polygon,
                                path,
                            }
                        }));
                    }
                    self.star_paths.push(PagePath {
                        polygon: outline.polygon,
                        path,
                    });
                }
            }
        }

        for piece in sky.asterisms.iter().flat_map(|a| &a.segments) {
            let segment = piece.segment.transformed(&self.transforms[piece.polygon.index()]);
            for tab in overlapping_tabs(topology, &self.tabs, piece.polygon) {
                if let Some(segment) = clip_segment_to_tab(&segment, tab) {
                    self.asterism_lines.push(PageSegment {
                        polygon: tab.polygon,
                        segment,
                    });
                }
            }
            self.asterism_lines.push(PageSegment {
                polygon: piece.polygon,
                segment,
            });
        }
    }
}
