//! Proximity graph: which particle pairs get a connecting line, and how opaque.
//!
//! Every unordered pair `(i, j)` with `i < j` is tested. The squared distance
//! rejects far pairs before any square root is taken; admitted pairs are
//! sorted into a fixed number of opacity buckets (bucket 0 = faintest, near
//! the cutoff distance; last bucket = nearest, most opaque).
//!
//! Cost is O(n²) in the particle count with no spatial index, which keeps the
//! practical count in the low hundreds at 60 fps.
//!
//! Bucket storage is allocated once and cleared every frame, so steady-state
//! rebuilding does not allocate.

use crate::particle::ParticleStore;
use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Line segment endpoints `(x1, y1, x2, y2)`.
///
/// Laid out as two consecutive `vec2<f32>` so a bucket slice can be uploaded
/// to the GPU as a line list without conversion.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Segment {
    pub from: [f32; 2],
    pub to: [f32; 2],
}

impl Segment {
    #[inline]
    pub fn new(from: Vec2, to: Vec2) -> Self {
        Self {
            from: from.to_array(),
            to: to.to_array(),
        }
    }

    #[inline]
    pub fn length(&self) -> f32 {
        Vec2::from(self.from).distance(Vec2::from(self.to))
    }
}

/// Map a distance in `[0, max_distance)` to a bucket index in `[0, bucket_count)`.
///
/// Nearer pairs get higher indices. Out-of-range results are clamped so a
/// pair sitting exactly at distance 0 still lands in the last bucket.
#[inline]
pub fn bucket_index(distance: f32, max_distance: f32, bucket_count: usize) -> usize {
    if bucket_count == 0 || max_distance <= 0.0 {
        return 0;
    }
    let closeness = 1.0 - distance / max_distance;
    let index = (closeness * bucket_count as f32).floor();
    (index.max(0.0) as usize).min(bucket_count - 1)
}

/// Per-frame bucket lists of connection segments.
#[derive(Debug, Clone)]
pub struct ProximityGraph {
    buckets: Vec<Vec<Segment>>,
}

impl ProximityGraph {
    /// Create empty buckets, reserving room for a typical frame.
    pub fn new(bucket_count: usize, particle_count: usize) -> Self {
        // A particle rarely has more than a few neighbours within range.
        let per_bucket = (particle_count * 4) / bucket_count.max(1);
        Self {
            buckets: (0..bucket_count).map(|_| Vec::with_capacity(per_bucket)).collect(),
        }
    }

    /// Build a graph from scratch for one store.
    pub fn build(store: &ParticleStore, bucket_count: usize, max_distance: f32) -> Self {
        let mut graph = Self::new(bucket_count, store.len());
        graph.rebuild(store, max_distance);
        graph
    }

    /// Clear and refill the buckets from the current particle positions.
    pub fn rebuild(&mut self, store: &ParticleStore, max_distance: f32) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }

        let bucket_count = self.buckets.len();
        if bucket_count == 0 || max_distance <= 0.0 {
            return;
        }

        let max_sq = max_distance * max_distance;
        let particles = store.particles();

        for (i, a) in particles.iter().enumerate() {
            for b in &particles[i + 1..] {
                let dist_sq = a.position.distance_squared(b.position);
                if dist_sq >= max_sq {
                    continue;
                }
                let index = bucket_index(dist_sq.sqrt(), max_distance, bucket_count);
                self.buckets[index].push(Segment::new(a.position, b.position));
            }
        }
    }

    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub fn bucket(&self, index: usize) -> &[Segment] {
        &self.buckets[index]
    }

    /// Buckets in increasing opacity order.
    pub fn buckets(&self) -> impl Iterator<Item = &[Segment]> + '_ {
        self.buckets.iter().map(Vec::as_slice)
    }

    /// Total number of connected pairs this frame.
    pub fn edge_count(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::Particle;

    fn at(points: &[(f32, f32)]) -> ParticleStore {
        ParticleStore::from_particles(
            points
                .iter()
                .map(|&(x, y)| Particle {
                    position: Vec2::new(x, y),
                    velocity: Vec2::ZERO,
                    radius: 1.0,
                    color_class: 0,
                    opacity: 1.0,
                    opacity_drift: 0.0,
                })
                .collect(),
        )
    }

    #[test]
    fn test_bucket_index_edges() {
        assert_eq!(bucket_index(0.0, 100.0, 10), 9);
        assert_eq!(bucket_index(99.9, 100.0, 10), 0);
        assert_eq!(bucket_index(50.0, 100.0, 10), 5);
        assert_eq!(bucket_index(150.0, 100.0, 10), 0);
        assert_eq!(bucket_index(10.0, 100.0, 1), 0);
        assert_eq!(bucket_index(10.0, 100.0, 0), 0);
    }

    #[test]
    fn test_far_pairs_rejected() {
        let store = at(&[(0.0, 0.0), (200.0, 0.0), (0.0, 100.0)]);
        let graph = ProximityGraph::build(&store, 5, 100.0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_each_pair_once() {
        let store = at(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]);
        let graph = ProximityGraph::build(&store, 5, 100.0);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_near_pair_goes_to_opaque_bucket() {
        let store = at(&[(0.0, 0.0), (5.0, 0.0), (300.0, 300.0), (395.0, 300.0)]);
        let graph = ProximityGraph::build(&store, 10, 100.0);
        assert_eq!(graph.bucket(9).len(), 1);
        assert_eq!(graph.bucket(0).len(), 1);
        assert_eq!(graph.bucket(9)[0], Segment::new(Vec2::ZERO, Vec2::new(5.0, 0.0)));
    }

    #[test]
    fn test_rebuild_clears_previous_frame() {
        let near = at(&[(0.0, 0.0), (5.0, 0.0)]);
        let far = at(&[(0.0, 0.0), (500.0, 0.0)]);
        let mut graph = ProximityGraph::build(&near, 4, 100.0);
        assert_eq!(graph.edge_count(), 1);
        let capacity = graph.buckets[3].capacity();

        graph.rebuild(&far, 100.0);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.buckets[3].capacity(), capacity);
    }

    #[test]
    fn test_zero_buckets_or_distance() {
        let store = at(&[(0.0, 0.0), (1.0, 0.0)]);
        assert_eq!(ProximityGraph::build(&store, 0, 100.0).edge_count(), 0);
        assert_eq!(ProximityGraph::build(&store, 4, 0.0).edge_count(), 0);
    }

    #[test]
    fn test_segment_layout() {
        assert_eq!(std::mem::size_of::<Segment>(), 16);
        let seg = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0));
        assert_eq!(seg.length(), 5.0);
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&seg));
        assert_eq!(floats, &[0.0, 0.0, 3.0, 4.0]);
    }
}
