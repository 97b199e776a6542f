use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::{ProjectionError, Result, StarfoldError};
use crate::geometry::shapes::bezier_star;
use crate::params::StarParams;
use crate::topology::Topology;

use super::{
    direction_from_angles, ProjectCurvePath, ProjectVector, ProjectedPath, ProjectedPoint,
    ProjectedSegment,
};

/// A catalog star. Angles are in radians.
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub id: u32,
    pub right_ascension: f64,
    pub declination: f64,
    pub magnitude: f64,
}

impl Star {
    #[must_use]
    pub fn new(id: u32, right_ascension: f64, declination: f64, magnitude: f64) -> Self {
        Self {
            id,
            right_ascension,
            declination,
            magnitude,
        }
    }
}

/// A named line figure. `stars` lists line end points pairwise:
/// `[a, b, c, d]` draws `a–b` and `c–d`.
#[derive(Debug, Clone, PartialEq)]
pub struct Asterism {
    pub name: String,
    pub stars: Vec<u32>,
}

impl Asterism {
    #[must_use]
    pub fn new(name: impl Into<String>, stars: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            stars,
        }
    }
}

/// A star placed on the surface, with its outline when it has one.
#[derive(Debug, Clone)]
pub struct ProjectedStar {
    pub star: Star,
    pub point: ProjectedPoint,
    pub outline: Vec<ProjectedPath>,
}

/// The surface segments of one asterism.
#[derive(Debug, Clone)]
pub struct ProjectedAsterism {
    pub name: String,
    pub segments: Vec<ProjectedSegment>,
}

/// Everything projected from a star catalog.
#[derive(Debug, Clone, Default)]
pub struct ProjectedSky {
    pub stars: Vec<ProjectedStar>,
    pub asterisms: Vec<ProjectedAsterism>,
    /// Ids of stars that could not be placed on the surface.
    pub skipped: Vec<u32>,
}

/// Projects a star catalog and its asterisms onto a topology.
///
/// Stars are projected in parallel. A star that misses the surface is
/// logged and skipped; structural failures abort the whole run.
#[derive(Debug, Clone, Copy)]
pub struct ProjectSky<'a> {
    stars: &'a [Star],
    asterisms: &'a [Asterism],
    params: StarParams,
}

impl<'a> ProjectSky<'a> {
    #[must_use]
    pub fn new(stars: &'a [Star], asterisms: &'a [Asterism], params: StarParams) -> Self {
        Self {
            stars,
            asterisms,
            params,
        }
    }

    /// # Errors
    ///
    /// Returns any error from curve or line projection other than a star
    /// missing the surface, e.g. [`ProjectionError::NoPath`].
    pub fn execute(&self, topology: &Topology) -> Result<ProjectedSky> {
        let in_asterism: HashSet<u32> = self
            .asterisms
            .iter()
            .flat_map(|a| a.stars.iter().copied())
            .collect();
        let outline = bezier_star(self.params.star_points, self.params.star_radius, None);

        let results: Vec<(u32, Option<ProjectedStar>)> = self
            .stars
            .par_iter()
            .map(|star| -> Result<(u32, Option<ProjectedStar>)> {
                let direction = direction_from_angles(star.right_ascension, star.declination);
                let Some(point) = ProjectVector::new(direction).execute(topology) else {
                    warn!(star = star.id, "star does not hit the surface, skipping");
                    return Ok((star.id, None));
                };

                let wants_outline = star.magnitude < self.params.shape_magnitude_limit
                    || in_asterism.contains(&star.id);
                let outline = if wants_outline {
                    match ProjectCurvePath::new(&outline, direction).execute(topology) {
                        Ok(paths) => paths,
                        Err(StarfoldError::Projection(ProjectionError::NoIntersection)) => {
                            warn!(
                                star = star.id,
                                "star outline does not hit the surface, skipping"
                            );
                            return Ok((star.id, None));
                        }
                        Err(err) => return Err(err),
                    }
                } else {
                    Vec::new()
                };

                Ok((
                    star.id,
                    Some(ProjectedStar {
                        star: star.clone(),
                        point,
                        outline,
                    }),
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut stars = Vec::with_capacity(results.len());
        let mut skipped = Vec::new();
        for (id, projected) in results {
            match projected {
                Some(star) => stars.push(star),
                None => skipped.push(id),
            }
        }

        let points: HashMap<u32, ProjectedPoint> =
            stars.iter().map(|s| (s.star.id, s.point)).collect();
        let asterisms = self
            .asterisms
            .par_iter()
            .map(|asterism| project_asterism(topology, asterism, &points))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            stars = stars.len(),
            skipped = skipped.len(),
            asterisms = asterisms.len(),
            "projected sky"
        );
        Ok(ProjectedSky {
            stars,
            asterisms,
            skipped,
        })
    }
}

fn project_asterism(
    topology: &Topology,
    asterism: &Asterism,
    points: &HashMap<u32, ProjectedPoint>,
) -> Result<ProjectedAsterism> {
    if asterism.stars.len() % 2 != 0 {
        warn!(asterism = %asterism.name, "odd number of asterism stars, ignoring the last");
    }

    let mut segments = Vec::new();
    for pair in asterism.stars.chunks_exact(2) {
        let (Some(a), Some(b)) = (points.get(&pair[0]), points.get(&pair[1])) else {
            warn!(
                asterism = %asterism.name,
                from = pair[0],
                to = pair[1],
                "asterism line references an unplaced star, skipping"
            );
            continue;
        };
        if (a.point - b.point).norm() < crate::math::EPSILON {
            continue;
        }
        segments.extend(topology.project_line_segment(&a.point, &b.point)?);
    }

    Ok(ProjectedAsterism {
        name: asterism.name.clone(),
        segments,
    })
}
