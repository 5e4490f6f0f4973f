//! Navigation service seam and the paths it produces.
//!
//! Path planning itself belongs to whatever owns the navigation mesh; the
//! controller only asks for paths and line-of-sight checks through
//! [`NavigationService`]. [`OpenGround`] is a straight-line planner for arenas
//! without obstacles, demos and tests.

use glam::Vec3;

/// Ordered waypoints returned by a navigation query.
///
/// The first waypoint is the position the query started from. Paths are
/// immutable once built; a new plan replaces the old one wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    waypoints: Vec<Vec3>,
}

impl Path {
    /// Wraps a waypoint sequence.
    #[must_use]
    pub const fn new(waypoints: Vec<Vec3>) -> Self {
        Self { waypoints }
    }

    /// An empty path, meaning "nowhere to go".
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            waypoints: Vec::new(),
        }
    }

    /// Number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Reports whether the path has no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Waypoint at `index`, if any.
    #[must_use]
    pub fn waypoint(&self, index: usize) -> Option<Vec3> {
        self.waypoints.get(index).copied()
    }

    /// Waypoint at `index`, clamped to the final waypoint.
    ///
    /// Returns `None` only for an empty path.
    #[must_use]
    pub fn waypoint_clamped(&self, index: usize) -> Option<Vec3> {
        let last = self.waypoints.len().checked_sub(1)?;
        self.waypoint(index.min(last))
    }

    /// All waypoints in order.
    #[must_use]
    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    /// Sum of the distances between consecutive waypoints.
    ///
    /// # Examples
    /// ```
    /// use glam::Vec3;
    /// use skirmish::navigation::Path;
    /// let path = Path::new(vec![Vec3::ZERO, Vec3::new(3.0, 0.0, 4.0), Vec3::new(3.0, 0.0, 10.0)]);
    /// assert!((path.length() - 11.0).abs() < 1e-6);
    /// ```
    #[must_use]
    pub fn length(&self) -> f32 {
        self.waypoints
            .windows(2)
            .map(|pair| match pair {
                [a, b] => a.distance(*b),
                _ => 0.0,
            })
            .sum()
    }
}

/// Path planning and line-of-sight queries against a navigation mesh.
///
/// Queries are synchronous. A query that fails for any reason reports "no
/// path"; the controller treats that as an ordinary outcome.
#[cfg_attr(test, mockall::automock)]
pub trait NavigationService {
    /// Shortest path from `from` to `to`, or `None` if unreachable.
    fn find_path(&self, from: Vec3, to: Vec3) -> Option<Path>;

    /// Returns `true` when the straight segment from `from` to `to` is
    /// obstructed on the mesh.
    fn raycast(&self, from: Vec3, to: Vec3) -> bool;
}

/// Obstacle-free planner producing straight two-point paths.
///
/// With `half_extent` set, the arena is the square `[-e, e]` on both ground
/// axes and destinations outside it are unreachable.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OpenGround {
    /// Half the side length of the square arena; `None` means unbounded.
    pub half_extent: Option<f32>,
}

impl OpenGround {
    /// Unbounded open ground.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self { half_extent: None }
    }

    /// Square arena centred on the origin.
    #[must_use]
    pub const fn bounded(half_extent: f32) -> Self {
        Self {
            half_extent: Some(half_extent),
        }
    }

    fn contains(&self, point: Vec3) -> bool {
        self.half_extent
            .map_or(true, |e| point.x.abs() <= e && point.z.abs() <= e)
    }
}

impl NavigationService for OpenGround {
    fn find_path(&self, from: Vec3, to: Vec3) -> Option<Path> {
        if !to.is_finite() || !self.contains(to) {
            return None;
        }
        Some(Path::new(vec![from, to]))
    }

    fn raycast(&self, _from: Vec3, _to: Vec3) -> bool {
        false
    }
}
