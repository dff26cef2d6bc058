use std::fmt::Write as _;

use slotmap::SlotMap;

use super::direction::{self, opposite};
use super::tile::{Link, Tile, TileId};

/// Arena for a plane's tiles. Tiles reference each other by [`TileId`];
/// the graph is cyclic, so the arena is the sole owner and nothing is
/// reference-counted.
pub struct TileGraph {
    tiles: SlotMap<TileId, Tile>,
    created: u32,
}

impl TileGraph {
    pub fn new() -> Self {
        Self {
            tiles: SlotMap::with_key(),
            created: 0,
        }
    }

    /// Move a tile into the arena, stamping its debug id.
    pub fn add(&mut self, mut tile: Tile) -> TileId {
        tile.id_no = self.created;
        self.created += 1;
        self.tiles.insert(tile)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Panics if `id` is stale; tile lifetimes are tied to the plane, so a
    /// miss is a programmer error.
    pub fn tile(&self, id: TileId) -> &Tile {
        &self.tiles[id]
    }

    pub fn tile_mut(&mut self, id: TileId) -> &mut Tile {
        &mut self.tiles[id]
    }

    pub fn iter(&self) -> impl Iterator<Item = (TileId, &Tile)> {
        self.tiles.iter()
    }

    /// Connect two tiles where both slots are free: `a.links[out_dir]`
    /// will point at `b`, and `b.links[in_dir]` back at `a`. Both links
    /// are written together, keeping the edge reciprocal.
    ///
    /// Panics if either slot is already occupied. One-way links are never
    /// allowed: you can always go back the way you came.
    pub fn link(&mut self, a: TileId, b: TileId, out_dir: u8, in_dir: u8) {
        assert!(out_dir < 6, "direction index out of range: {out_dir}");
        assert!(in_dir < 6, "direction index out of range: {in_dir}");

        let out_taken = self.tiles[a].links[out_dir as usize].is_some();
        let in_taken = self.tiles[b].links[in_dir as usize].is_some();
        if out_taken || in_taken {
            panic!(
                "tile link error:\n  {} out {}: {}\n  {} in {}: {}",
                self.tile(a).id_str(),
                out_dir,
                self.list_links(a, Some(out_dir)),
                self.tile(b).id_str(),
                in_dir,
                self.list_links(b, Some(in_dir)),
            );
        }

        self.tiles[b].links[in_dir as usize] = Some(Link { to: a, back: out_dir });
        self.tiles[a].links[out_dir as usize] = Some(Link { to: b, back: in_dir });
    }

    /// [`link`](Self::link) with the conventional reciprocal slot.
    pub fn link_opposite(&mut self, a: TileId, b: TileId, out_dir: u8) {
        self.link(a, b, out_dir, opposite(out_dir));
    }

    /// Splice `new` into the live edge `a.links[out_dir] → dest`, leaving
    /// `a ↔ new ↔ dest`. Neither endpoint moves; `new` carries the old
    /// incoming directions on both of its ends.
    ///
    /// Panics unless `a.links[out_dir]` is present and `new`'s `in_dir`
    /// and `opposite(in_dir)` slots are both free.
    pub fn insert(&mut self, a: TileId, new: TileId, out_dir: u8, in_dir: u8) {
        assert!(out_dir < 6, "direction index out of range: {out_dir}");
        assert!(in_dir < 6, "direction index out of range: {in_dir}");
        assert_ne!(out_dir, in_dir, "insert needs two distinct edges on the new tile");

        let outbound = self.tiles[a].links[out_dir as usize].unwrap_or_else(|| {
            panic!(
                "cannot insert on an empty edge: {} out {}: {}",
                self.tile(a).id_str(),
                out_dir,
                self.list_links(a, Some(out_dir)),
            )
        });
        // The reciprocal of the edge we're splitting.
        let inbound = self.tiles[outbound.to].links[outbound.back as usize]
            .expect("reciprocity violated: live edge has no back-link");

        assert!(
            self.tiles[new].links[in_dir as usize].is_none()
                && self.tiles[new].links[opposite(in_dir) as usize].is_none(),
            "inserted tile {} already linked: {}",
            self.tile(new).id_str(),
            self.list_links(new, Some(in_dir)),
        );

        self.tiles[new].links[out_dir as usize] = Some(outbound);
        self.tiles[new].links[in_dir as usize] = Some(inbound);
        self.tiles[a].links[out_dir as usize] = Some(Link { to: new, back: in_dir });
        self.tiles[outbound.to].links[outbound.back as usize] =
            Some(Link { to: new, back: out_dir });
    }

    /// [`insert`](Self::insert) with the conventional reciprocal slot.
    pub fn insert_opposite(&mut self, a: TileId, new: TileId, out_dir: u8) {
        self.insert(a, new, out_dir, opposite(out_dir));
    }

    /// The link out of `t` through edge `d`, if any.
    pub fn neighbor(&self, t: TileId, d: u8) -> Option<Link> {
        self.tiles[t].links[d as usize]
    }

    /// The link out of `t` resolved from the edge we entered by and a
    /// relative quarter-turn in `[-3, 3]`. `turn = 0` continues straight.
    pub fn neighbor_relative(&self, t: TileId, came_from: u8, turn: i8) -> Option<Link> {
        self.neighbor(t, direction::relative(came_from, turn))
    }

    /// One-line occupancy summary of a tile's six slots, for diagnostics.
    /// Occupied slots print their direction index with the destination,
    /// the highlighted slot is bracketed.
    pub fn list_links(&self, t: TileId, highlight: Option<u8>) -> String {
        let tile = self.tile(t);
        let mut out = format!("tile {}:", tile.id_str());
        for (i, slot) in tile.links.iter().enumerate() {
            let marked = highlight == Some(i as u8);
            match (slot, marked) {
                (Some(link), true) => {
                    let _ = write!(out, " [{}→{}]", i, self.tile(link.to).id_str());
                }
                (Some(link), false) => {
                    let _ = write!(out, " {}→{}", i, self.tile(link.to).id_str());
                }
                (None, true) => {
                    let _ = write!(out, " [{i}·]");
                }
                (None, false) => {
                    let _ = write!(out, " {i}·");
                }
            }
        }
        out
    }
}

impl Default for TileGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl TileGraph {
    /// Every link must have a back-link naming the same edge pair.
    pub fn assert_reciprocal(&self) {
        for (id, tile) in self.iter() {
            for (d, slot) in tile.links.iter().enumerate() {
                let Some(link) = slot else { continue };
                let back = self.tile(link.to).links[link.back as usize]
                    .unwrap_or_else(|| {
                        panic!(
                            "edge {}:{} → {} has no back-link",
                            tile.id_str(),
                            d,
                            self.tile(link.to).id_str()
                        )
                    });
                assert_eq!(back.to, id, "back-link of {}:{} targets the wrong tile", tile.id_str(), d);
                assert_eq!(
                    back.back, d as u8,
                    "back-link of {}:{} names the wrong edge",
                    tile.id_str(),
                    d
                );
            }
        }
    }
}
