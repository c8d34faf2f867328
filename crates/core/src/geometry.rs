//! Geometry helpers for square sprites.
//!
//! Positions are the top-left corner of a sprite's bounding box. Projectiles
//! leave through one of the four edge midpoints of their caster.

use crate::types::DVec2;

/// One side of a square bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    /// Edges in the order they are considered when picking a spawn side.
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    /// Absolute midpoint of this edge for a `size`-pixel sprite at `position`.
    pub fn midpoint(self, position: DVec2, size: u32) -> DVec2 {
        let half = half_ceil(size);
        let size = size as f64;
        let offset = match self {
            Edge::Top => DVec2::new(half, 0.0),
            Edge::Right => DVec2::new(size, half),
            Edge::Bottom => DVec2::new(half, size),
            Edge::Left => DVec2::new(0.0, half),
        };
        position + offset
    }

    /// Top-left corner for a `size`-pixel projectile leaving through this edge.
    ///
    /// The projectile is centred on `midpoint` along the edge and sits just
    /// outside it.
    pub fn spawn_origin(self, midpoint: DVec2, size: u32) -> DVec2 {
        let half = half_ceil(size);
        let size = size as f64;
        let offset = match self {
            Edge::Top => DVec2::new(-half, -size),
            Edge::Right => DVec2::new(0.0, -half),
            Edge::Bottom => DVec2::new(-half, 0.0),
            Edge::Left => DVec2::new(-size, -half),
        };
        midpoint + offset
    }
}

/// The four edge midpoints of a sprite, in [`Edge::ALL`] order.
pub fn edge_midpoints(position: DVec2, size: u32) -> [DVec2; 4] {
    Edge::ALL.map(|edge| edge.midpoint(position, size))
}

/// Edge whose midpoint is nearest `target`. Ties go to the earlier edge.
pub fn nearest_edge(position: DVec2, size: u32, target: DVec2) -> Edge {
    let mut best = Edge::Top;
    let mut best_dist = Edge::Top.midpoint(position, size).distance(target);
    for edge in [Edge::Right, Edge::Bottom, Edge::Left] {
        let dist = edge.midpoint(position, size).distance(target);
        if dist < best_dist {
            best = edge;
            best_dist = dist;
        }
    }
    best
}

/// Unit vector along `v`, or zero when `v` has no length.
pub fn direction(v: DVec2) -> DVec2 {
    v.normalize_or_zero()
}

fn half_ceil(size: u32) -> f64 {
    size.div_ceil(2) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midpoints_of_odd_sprite_round_up() {
        let mids = edge_midpoints(DVec2::new(10.0, 20.0), 5);
        assert_eq!(mids[0], DVec2::new(13.0, 20.0));
        assert_eq!(mids[1], DVec2::new(15.0, 23.0));
        assert_eq!(mids[2], DVec2::new(13.0, 25.0));
        assert_eq!(mids[3], DVec2::new(10.0, 23.0));
    }

    #[test]
    fn nearest_edge_picks_facing_side() {
        let pos = DVec2::new(0.0, 0.0);
        assert_eq!(nearest_edge(pos, 10, DVec2::new(5.0, -50.0)), Edge::Top);
        assert_eq!(nearest_edge(pos, 10, DVec2::new(60.0, 5.0)), Edge::Right);
        assert_eq!(nearest_edge(pos, 10, DVec2::new(5.0, 60.0)), Edge::Bottom);
        assert_eq!(nearest_edge(pos, 10, DVec2::new(-50.0, 5.0)), Edge::Left);
    }

    #[test]
    fn nearest_edge_tie_prefers_top() {
        // Centre of the sprite is equidistant from all midpoints.
        assert_eq!(nearest_edge(DVec2::ZERO, 10, DVec2::new(5.0, 5.0)), Edge::Top);
    }

    #[test]
    fn spawn_origin_sits_outside_each_edge() {
        let pos = DVec2::new(100.0, 100.0);
        let size = 10;
        let bullet = 4;

        let top = Edge::Top.spawn_origin(Edge::Top.midpoint(pos, size), bullet);
        assert_eq!(top, DVec2::new(103.0, 96.0));

        let right = Edge::Right.spawn_origin(Edge::Right.midpoint(pos, size), bullet);
        assert_eq!(right, DVec2::new(110.0, 103.0));

        let bottom = Edge::Bottom.spawn_origin(Edge::Bottom.midpoint(pos, size), bullet);
        assert_eq!(bottom, DVec2::new(103.0, 110.0));

        let left = Edge::Left.spawn_origin(Edge::Left.midpoint(pos, size), bullet);
        assert_eq!(left, DVec2::new(96.0, 103.0));
    }

    #[test]
    fn direction_of_zero_vector_is_zero() {
        assert_eq!(direction(DVec2::ZERO), DVec2::ZERO);
        let d = direction(DVec2::new(3.0, 4.0));
        assert!((d.length() - 1.0).abs() < 1e-12);
        assert!((d.x - 0.6).abs() < 1e-12);
    }
}
