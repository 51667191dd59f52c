//! Nearest-target search.
//!
//! A linear scan by straight-line distance over a roster. It does not read
//! the spatial index, so entities dropped from the index are still found.

use glam::Vec2;

use crate::entity::{Enemy, Soldier};

/// Anything with a position to measure distance from.
pub trait Positioned {
    /// Reference point for distance checks.
    fn position(&self) -> Vec2;
}

impl Positioned for Soldier {
    fn position(&self) -> Vec2 {
        self.position
    }
}

impl Positioned for Enemy {
    fn position(&self) -> Vec2 {
        self.position
    }
}

/// Closest candidate to `from`, or `None` when there are no candidates.
///
/// Ties go to the earliest candidate in iteration order.
pub fn find_nearest<'a, T, I>(candidates: I, from: Vec2) -> Option<&'a T>
where
    T: Positioned + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut best: Option<(&'a T, f32)> = None;
    for candidate in candidates {
        let distance = candidate.position().distance_squared(from);
        match best {
            Some((_, best_distance)) if best_distance <= distance => {}
            _ => best = Some((candidate, distance)),
        }
    }
    best.map(|(candidate, _)| candidate)
}

/// Closest candidate strictly closer than `range`.
pub fn nearest_within<'a, T, I>(candidates: I, from: Vec2, range: f32) -> Option<&'a T>
where
    T: Positioned + 'a,
    I: IntoIterator<Item = &'a T>,
{
    find_nearest(candidates, from).filter(|candidate| candidate.position().distance(from) < range)
}
