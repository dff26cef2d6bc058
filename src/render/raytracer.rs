//! Graph raytracer.
//!
//! The geometry has no external location or orientation, so we must walk
//! it to find out what we've got. There are two lobes here: the trace
//! works on a flat north-facing Cartesian grid in view coordinates, and
//! the walker translates each absolute one-cell move into a relative
//! traversal of the directed cyclic tile graph, carrying the direction it
//! last entered a tile by.

use glam::DVec2;

use crate::world::graph::TileGraph;
use crate::world::tile::TileId;

/// Callbacks fired as a ray advances.
pub trait RaySink {
    /// The ray entered a tile at view cell `(x, y)`.
    fn on_tile(&mut self, tile: TileId, x: i32, y: i32);

    /// The ray ran off the world at view cell `(x, y)`.
    fn on_empty(&mut self, x: i32, y: i32);

    /// The trace stopped early; `tile` is where the walker ended up. May
    /// not be the target tile: it might have hit something.
    fn on_last_tile(&mut self, tile: TileId, x: i32, y: i32) {
        let _ = (tile, x, y);
    }

    /// The trace ran its full length to the target cell.
    fn on_target_tile(&mut self, tile: TileId, x: i32, y: i32) {
        let _ = (tile, x, y);
    }
}

pub struct Raytracer {
    start_tile: TileId,
    /// View rotation folded into the first step of each ray.
    start_rot: u8,

    loc: TileId,
    /// Direction index in `loc` the ray most recently entered from.
    dir: u8,
    moved: bool,
    last_x: i32,
    last_y: i32,
    /// Absolute view-space direction of the previous grid step.
    last_abs: i8,
}

impl Raytracer {
    pub fn new(start_tile: TileId, start_rot: u8) -> Self {
        Self {
            start_tile,
            start_rot,
            loc: start_tile,
            dir: 0,
            moved: false,
            last_x: 0,
            last_y: 0,
            last_abs: 0,
        }
    }

    /// Re-seat the tracer, e.g. after the camera moved.
    pub fn set_origin(&mut self, tile: TileId, rot: u8) {
        self.start_tile = tile;
        self.start_rot = rot;
    }

    fn reset(&mut self, x: i32, y: i32) {
        self.loc = self.start_tile;
        self.dir = 0;
        self.moved = false;
        self.last_x = x;
        self.last_y = y;
        self.last_abs = 0;
    }

    /// Advance the walker to the adjacent cell `(x, y)`. Returns whether
    /// the trace may continue past it.
    fn step(&mut self, graph: &TileGraph, sink: &mut dyn RaySink, x: i32, y: i32) -> bool {
        let delta_x = x - self.last_x;
        let delta_y = y - self.last_y;
        if delta_x == 0 && delta_y == 0 {
            return true;
        }
        // The walker can only move one step at a time; the trace feeds it
        // strictly axial sub-steps.
        assert!(
            delta_x.abs() + delta_y.abs() == 1,
            "walker asked to jump by ({delta_x}, {delta_y})"
        );

        let d_abs: i8 = if delta_y == 1 {
            0
        } else if delta_x == 1 {
            1
        } else if delta_y == -1 {
            2
        } else {
            3
        };

        let link = if !self.moved {
            // First step off the origin: absolute lookup, with the view's
            // rotation selecting which edge "forward" is.
            graph.neighbor(self.loc, (d_abs as u8 + self.start_rot) % 4)
        } else {
            // Relative: the turn the ray took in view space, applied as a
            // rotation of the walker's heading through the graph.
            graph.neighbor_relative(self.loc, self.dir, d_abs - self.last_abs)
        };

        self.moved = true;
        self.last_x = x;
        self.last_y = y;

        let Some(link) = link else {
            sink.on_empty(x, y);
            return false;
        };
        self.loc = link.to;
        self.dir = link.back;
        self.last_abs = d_abs;
        sink.on_tile(self.loc, x, y);
        !graph.tile(self.loc).is_opaque
    }

    /// Trace from `(sx, sy)` toward `(dx, dy)` in view coordinates,
    /// visiting every cell under the ray. Motion is zig-zag — x first,
    /// then y — since the tiling has no diagonal links.
    pub fn trace(&mut self, graph: &TileGraph, source: DVec2, dest: DVec2, sink: &mut dyn RaySink) {
        self.reset(source.x.round() as i32, source.y.round() as i32);

        // One more fence post than the longest axis, so the final
        // interpolation lands exactly on the destination cell.
        let span = (source - dest).abs();
        let steps = span.x.max(span.y) as i32 + 1;

        let mut last_y = self.last_y;
        for step in 1..=steps {
            let t = f64::from(step) / f64::from(steps);
            let at = source + (dest - source) * t;
            let x = at.x.round() as i32;
            let y = at.y.round() as i32;

            if !self.step(graph, sink, x, last_y) || !self.step(graph, sink, x, y) {
                sink.on_last_tile(self.loc, self.last_x, self.last_y);
                return;
            }
            last_y = y;
        }
        sink.on_target_tile(self.loc, self.last_x, self.last_y);
    }
}
