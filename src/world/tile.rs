use slotmap::new_key_type;
use smallvec::SmallVec;

use crate::entity::EntityId;
use crate::render::color::Color;

new_key_type! {
    /// Stable handle into a plane's tile storage. Generational index via
    /// SlotMap — safe to hold across insertions.
    pub struct TileId;
}

/// Room-id sentinels. Real rooms count up from [`ROOM_BASE`].
pub const ROOM_UNINIT: u16 = 0;
pub const ROOM_HIDDEN: u16 = 1;
pub const ROOM_EMPTY: u16 = 2;
pub const ROOM_HALLWAY: u16 = 9;
pub const ROOM_BASE: u16 = 10;

/// A directed edge: the tile we are linking to, and the index in *its*
/// link array that points back at us.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
    pub to: TileId,
    pub back: u8,
}

/// One square place in a plane, with six directional edges.
///
/// There is no global coordinate system; a tile's only geometry is its
/// links. Link slots may only be mutated through [`TileGraph::link`] and
/// [`TileGraph::insert`], which keep every edge reciprocal.
///
/// [`TileGraph::link`]: super::graph::TileGraph::link
/// [`TileGraph::insert`]: super::graph::TileGraph::insert
#[derive(Clone, Debug)]
pub struct Tile {
    /// Monotonic per-graph counter, for debug output only.
    pub id_no: u32,
    pub links: [Option<Link>; 6],
    pub room_id: u16,
    /// A one-character-wide UTF-8 grapheme, up to 4 bytes.
    pub glyph: &'static str,
    /// Blocks rays past this tile.
    pub is_opaque: bool,
    pub bg_color: Color,
    pub fg_color: Color,
    /// Entities standing on this tile, back = most recently arrived.
    pub occupants: SmallVec<[EntityId; 2]>,
}

impl Default for Tile {
    fn default() -> Self {
        Self {
            id_no: 0,
            links: [None; 6],
            room_id: ROOM_UNINIT,
            glyph: " ",
            is_opaque: false,
            bg_color: Color::BLACK,
            fg_color: Color::WHITE,
            occupants: SmallVec::new(),
        }
    }
}

impl Tile {
    /// Zero-padded id for log lines, matching the width of typical maps.
    pub fn id_str(&self) -> String {
        format!("{:03}", self.id_no)
    }
}
