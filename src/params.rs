//! Parameters for sky projection and template layout.

/// How stars are turned into overlay content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarParams {
    /// Stars with a magnitude below this (brighter) get a projected outline.
    pub shape_magnitude_limit: f64,

    /// Tip radius of the star outline, in patch units.
    pub star_radius: f64,

    /// Number of tips of the star outline.
    pub star_points: usize,
}

impl Default for StarParams {
    fn default() -> Self {
        Self {
            shape_magnitude_limit: 2.0,
            star_radius: 0.01,
            star_points: 5,
        }
    }
}

impl StarParams {
    /// No outlines for non-asterism stars, only projected points.
    #[must_use]
    pub fn points_only() -> Self {
        Self {
            shape_magnitude_limit: f64::NEG_INFINITY,
            ..Default::default()
        }
    }

    #[must_use]
    pub const fn with_shape_magnitude_limit(mut self, limit: f64) -> Self {
        self.shape_magnitude_limit = limit;
        self
    }

    #[must_use]
    pub const fn with_star_radius(mut self, radius: f64) -> Self {
        self.star_radius = radius;
        self
    }

    #[must_use]
    pub const fn with_star_points(mut self, points: usize) -> Self {
        self.star_points = points;
        self
    }
}

/// What the page scale is fitted to.
///
/// Page sizes include the margin. Solid measures refer to the assembled
/// model and are given in page units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scaling {
    PageWidth(f64),
    PageHeight(f64),
    /// Printed length of an edge.
    EdgeLength(f64),
    /// Distance from the center to a face center.
    InscribedRadius(f64),
    /// Distance from the center to the farthest vertex.
    CircumscribedRadius(f64),
}

/// Page layout of the unfolded net.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateParams {
    /// Tab height as a fraction of the edge length.
    pub tab_scale: f64,

    /// How the net is sized on the page.
    pub scaling: Scaling,

    /// Margin around the net, in multiples of the tab height.
    pub padding_factor: f64,
}

impl Default for TemplateParams {
    fn default() -> Self {
        Self {
            tab_scale: 0.1,
            scaling: Scaling::PageWidth(71.0),
            padding_factor: 1.25,
        }
    }
}

impl TemplateParams {
    #[must_use]
    pub const fn with_tab_scale(mut self, scale: f64) -> Self {
        self.tab_scale = scale;
        self
    }

    #[must_use]
    pub const fn with_scaling(mut self, scaling: Scaling) -> Self {
        self.scaling = scaling;
        self
    }

    /// Fits the page, margins included, to `width`.
    #[must_use]
    pub const fn with_page_width(mut self, width: f64) -> Self {
        self.scaling = Scaling::PageWidth(width);
        self
    }

    #[must_use]
    pub const fn with_padding_factor(mut self, factor: f64) -> Self {
        self.padding_factor = factor;
        self
    }
}
