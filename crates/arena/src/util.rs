//! Random sampling and small math helpers.

use glam::Vec2;
use rand::Rng;

/// Uniform sample in `[min, max)`. Degenerate ranges return `min`.
#[inline]
pub fn random_between<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}

/// Uniform random point inside the square world `[0, size]²`.
#[inline]
pub fn random_position<R: Rng + ?Sized>(rng: &mut R, size: f32) -> Vec2 {
    Vec2::new(random_between(rng, 0.0, size), random_between(rng, 0.0, size))
}

/// Random unit vector.
#[inline]
pub fn random_unit<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    Vec2::new(angle.cos(), angle.sin())
}

/// Normalize `direction`, falling back to a random unit vector for zero-length input.
#[inline]
pub fn direction_or_random<R: Rng + ?Sized>(rng: &mut R, direction: Vec2) -> Vec2 {
    let normalized = direction.normalize_or_zero();
    if normalized == Vec2::ZERO {
        random_unit(rng)
    } else {
        normalized
    }
}

/// Clamp a point to the square world `[0, size]²`.
#[inline]
pub fn clamp_to_world(position: Vec2, size: f32) -> Vec2 {
    position.clamp(Vec2::ZERO, Vec2::splat(size))
}

/// Index and squared distance of the point nearest to `from`.
pub fn nearest<I>(from: Vec2, points: I) -> Option<(usize, f32)>
where
    I: IntoIterator<Item = Vec2>,
{
    let mut best: Option<(usize, f32)> = None;
    for (index, point) in points.into_iter().enumerate() {
        let dist_sq = point.distance_squared(from);
        if best.is_none_or(|(_, best_sq)| dist_sq < best_sq) {
            best = Some((index, dist_sq));
        }
    }
    best
}
