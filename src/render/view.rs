//! The view: a camera seated on a tile, projecting the non-Euclidean
//! graph onto a regular grid of cells. Because tiles only relate through
//! their links, the same tile may appear several times in one frame, and
//! crossing a twisted edge re-orients the whole world.

use glam::DVec2;

use crate::entity::event::Event;
use crate::entity::EntityStore;
use crate::world::direction::opposite;
use crate::world::graph::TileGraph;
use crate::world::tile::{Tile, TileId, ROOM_EMPTY, ROOM_HIDDEN};

use super::cell::{TextCell, TextCellGrid};
use super::raytracer::{RaySink, Raytracer};

/// What a ray found at a scratch cell, if anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Scratch {
    /// No ray reached this cell.
    Hidden,
    /// A ray ran off the world here.
    Empty,
    Seen(TileId),
}

/// Sub-pixel offsets for the repeated fan passes. The fan is re-traced
/// with these nudges along the destination's traversal axis to fill
/// aliasing gaps in the projection; the plain pass runs last so exact
/// rays win the cell.
const FAN_OFFSETS: [f64; 4] = [0.25, 0.75, 0.5, 0.0];

pub struct View {
    loc: TileId,
    rot: u8,
    width: usize,
    height: usize,
    scratch: Vec<Scratch>,
    hidden_tile: Tile,
    empty_tile: Tile,
}

struct ScratchSink<'a> {
    cells: &'a mut [Scratch],
    width: usize,
    height: usize,
}

impl ScratchSink<'_> {
    fn put(&mut self, x: i32, y: i32, value: Scratch) {
        if x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height {
            self.cells[y as usize * self.width + x as usize] = value;
        }
    }
}

impl RaySink for ScratchSink<'_> {
    fn on_tile(&mut self, tile: TileId, x: i32, y: i32) {
        self.put(x, y, Scratch::Seen(tile));
    }

    fn on_empty(&mut self, x: i32, y: i32) {
        self.put(x, y, Scratch::Empty);
    }
}

impl View {
    pub fn new(width: usize, height: usize, point_of_view: TileId) -> Self {
        Self {
            loc: point_of_view,
            rot: 0,
            width,
            height,
            scratch: vec![Scratch::Hidden; width * height],
            hidden_tile: Tile {
                room_id: ROOM_HIDDEN,
                glyph: "░",
                ..Tile::default()
            },
            empty_tile: Tile {
                room_id: ROOM_EMPTY,
                glyph: "▓",
                ..Tile::default()
            },
        }
    }

    pub fn loc(&self) -> TileId {
        self.loc
    }

    pub fn rot(&self) -> u8 {
        self.rot
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Project a frame into `target`. The scratch grid is resized to the
    /// target, every cell starts hidden, and a fan of rays from the
    /// center paints what the camera can see; the cells are then
    /// composed, letting each tile's occupants speak for it first.
    ///
    /// The ray sequence is deterministic, and the last write to a cell
    /// wins, so a frame is a pure function of `(loc, rot, target size)`.
    pub fn render(&mut self, graph: &TileGraph, entities: &mut EntityStore, target: &mut TextCellGrid) {
        let (w, h) = (target.width(), target.height());
        assert!(w >= 1 && h >= 1, "cannot render into an empty grid");
        self.width = w;
        self.height = h;
        self.scratch.clear();
        self.scratch.resize(w * h, Scratch::Hidden);

        let center = (w / 2, h / 2);
        let source = DVec2::new(center.0 as f64, center.1 as f64);

        {
            let mut sink = ScratchSink {
                cells: &mut self.scratch,
                width: w,
                height: h,
            };
            let mut tracer = Raytracer::new(self.loc, self.rot);

            let columns = if w > 1 { vec![0, w - 1] } else { vec![0] };
            let rows = if h > 1 { vec![0, h - 1] } else { vec![0] };
            for offset in FAN_OFFSETS {
                for &x in &columns {
                    for y in 0..h.saturating_sub(1) {
                        let dest = DVec2::new(x as f64, y as f64 + offset);
                        tracer.trace(graph, source, dest, &mut sink);
                    }
                }
                for x in 0..w.saturating_sub(1) {
                    for &y in &rows {
                        let dest = DVec2::new(x as f64 + offset, y as f64);
                        tracer.trace(graph, source, dest, &mut sink);
                    }
                }
            }
            // The far corner is missed by the perimeter sweeps above.
            tracer.trace(graph, source, DVec2::new(w as f64, h as f64), &mut sink);
        }

        // The center is never traced, it's where we're standing.
        self.scratch[center.1 * w + center.0] = Scratch::Seen(self.loc);

        for y in 0..h {
            for x in 0..w {
                let tile = match self.scratch[y * w + x] {
                    Scratch::Hidden => &self.hidden_tile,
                    Scratch::Empty => &self.empty_tile,
                    Scratch::Seen(id) => graph.tile(id),
                };
                let mut cell = TextCell {
                    character: tile.glyph,
                    foreground: tile.fg_color,
                    background: tile.bg_color,
                    attributes: 0,
                };
                for &occupant in &tile.occupants {
                    let Event::GetRendered { glyph, fg_color, .. } =
                        entities.dispatch(occupant, Event::get_rendered())
                    else {
                        unreachable!("dispatch returns the event it was given")
                    };
                    if let Some(glyph) = glyph {
                        cell.character = glyph;
                        cell.foreground = fg_color;
                        break;
                    }
                }
                *target.get_mut(x, y) = cell;
            }
        }
    }

    /// Step the camera one tile in a view-relative horizontal direction
    /// (0..4, 0 = forward). A missing edge consumes the input silently.
    ///
    /// Crossing an edge re-derives the rotation so the viewer's relative
    /// "forward" survives any twist in the link: the rotational delta is
    /// the opposite of the arrival direction minus the departure edge.
    pub fn move_camera(&mut self, graph: &mut TileGraph, direction: u8) {
        assert!(direction < 4, "move direction out of range: {direction}");
        let e_abs = (direction + self.rot) % 4;
        let Some(link) = graph.neighbor(self.loc, e_abs) else {
            return;
        };

        // Hack: drag the most recently arrived occupant along with the
        // camera. That's always the player for now, since nothing else
        // moves; wants an explicit player handle eventually.
        let rider = graph.tile_mut(self.loc).occupants.pop();

        self.rot = (self.rot + opposite(link.back) + 4 - e_abs) % 4;
        self.loc = link.to;

        if let Some(rider) = rider {
            graph.tile_mut(self.loc).occupants.push(rider);
        }
    }

    /// Spin in place by `delta` quarter-turns.
    pub fn turn(&mut self, delta: i8) {
        self.rot = (self.rot as i8 + delta).rem_euclid(4) as u8;
    }
}
