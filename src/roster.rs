//! Resolving target handles to live positions.
//!
//! Agents hold opponents by handle, never by reference. Every tick the handle
//! is resolved through a [`Roster`]; destroyed or deactivated opponents simply
//! stop resolving.

use std::hash::{BuildHasher, Hash};

use glam::Vec3;
use hashbrown::HashMap;

/// Read-only view of the opponents an agent may target.
pub trait Roster<H> {
    /// Current position of `handle`, or `None` when it is destroyed or
    /// inactive.
    fn locate(&self, handle: H) -> Option<Vec3>;

    /// Every handle the roster knows about, used for scene discovery when no
    /// registry was supplied.
    ///
    /// The order becomes the agent's registry order, which breaks ties
    /// between equally short paths, so it must not depend on hashing.
    fn handles(&self) -> Vec<H>;
}

impl<H, S> Roster<H> for HashMap<H, Vec3, S>
where
    H: Copy + Ord + Hash,
    S: BuildHasher,
{
    fn locate(&self, handle: H) -> Option<Vec3> {
        self.get(&handle).copied()
    }

    /// Handles in ascending order.
    fn handles(&self) -> Vec<H> {
        let mut handles: Vec<H> = self.keys().copied().collect();
        handles.sort_unstable();
        handles
    }
}
