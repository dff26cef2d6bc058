//! Room generators: square (optionally wrapped into a cylinder or torus)
//! and conical. Each produces a tile subgraph plus the list of free edges
//! a hallway may later splice into.

use smallvec::SmallVec;

use super::graph::TileGraph;
use super::tile::{Tile, TileId};
use crate::render::color::Color;

/// An advertised unplugged edge of a room, awaiting a hallway.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomConnection {
    pub tile: TileId,
    pub dir: u8,
}

/// A subgraph generated as a unit: a seed (centroid) tile plus free
/// connection edges.
#[derive(Clone, Debug)]
pub struct Room {
    pub id: u16,
    pub seed: TileId,
    pub connections: SmallVec<[RoomConnection; 4]>,
}

/// Door mask bits, up/right/bottom/left like in CSS.
pub const DOOR_TOP: u8 = 0b0001;
pub const DOOR_RIGHT: u8 = 0b0010;
pub const DOOR_BOTTOM: u8 = 0b0100;
pub const DOOR_LEFT: u8 = 0b1000;
pub const DOOR_ALL: u8 = 0b1111;

fn floor_tile(room_id: u16, x: usize, y: usize, fg: Color, bg: Color) -> Tile {
    Tile {
        room_id,
        glyph: if (x + y) % 2 == 1 { "," } else { "." },
        fg_color: fg,
        bg_color: bg,
        ..Tile::default()
    }
}

/// Allocate a `w×h` column-major grid of floor tiles and link it
/// orthogonally: edge 1 eastward, edge 2 southward. Wrapped axes link
/// their last rank back to the first.
fn gen_grid(
    graph: &mut TileGraph,
    room_id: u16,
    w: usize,
    h: usize,
    wrap_x: bool,
    wrap_y: bool,
    fg: Color,
    bg: Color,
) -> Vec<Vec<TileId>> {
    let mut grid: Vec<Vec<TileId>> = Vec::with_capacity(w);
    for x in 0..w {
        let mut column = Vec::with_capacity(h);
        for y in 0..h {
            column.push(graph.add(floor_tile(room_id, x, y, fg, bg)));
        }
        grid.push(column);
    }

    let x_links = if wrap_x { w } else { w - 1 };
    for x in 0..x_links {
        for y in 0..h {
            graph.link_opposite(grid[x][y], grid[(x + 1) % w][y], 1);
        }
    }
    let y_links = if wrap_y { h } else { h - 1 };
    for x in 0..w {
        for y in 0..y_links {
            graph.link_opposite(grid[x][y], grid[x][(y + 1) % h], 2);
        }
    }
    grid
}

/// Doors along one un-wrapped side of a cylinder, spaced at 1/3 and 2/3
/// of the side's length; sides of length 3 or less get a single centered
/// door instead, since the thirds would crowd into each other.
fn cylinder_door_offsets(len: usize) -> SmallVec<[usize; 2]> {
    if len <= 3 {
        SmallVec::from_slice(&[len / 2])
    } else {
        SmallVec::from_slice(&[len / 3, 2 * len / 3])
    }
}

/// A `w×h` room, optionally wrapped into a cylinder (one axis) or torus
/// (both). Door exposure depends on the wrap flags: a torus has no free
/// sides, a cylinder advertises two doors per un-wrapped side, a plain
/// rectangle one centered door per side, all gated by `door_mask`.
pub fn gen_square_room(
    graph: &mut TileGraph,
    room_id: u16,
    w: usize,
    h: usize,
    wrap_x: bool,
    wrap_y: bool,
    fg: Color,
    bg: Color,
    door_mask: u8,
) -> Room {
    assert!(w >= 1 && h >= 1, "degenerate room: {w}x{h}");
    let grid = gen_grid(graph, room_id, w, h, wrap_x, wrap_y, fg, bg);

    let mut connections = SmallVec::new();
    match (wrap_x, wrap_y) {
        (true, true) => {} // torus: every edge is interior
        (true, false) => {
            for x in cylinder_door_offsets(w) {
                if door_mask & DOOR_TOP != 0 {
                    connections.push(RoomConnection { tile: grid[x][0], dir: 0 });
                }
                if door_mask & DOOR_BOTTOM != 0 {
                    connections.push(RoomConnection { tile: grid[x][h - 1], dir: 2 });
                }
            }
        }
        (false, true) => {
            for y in cylinder_door_offsets(h) {
                if door_mask & DOOR_RIGHT != 0 {
                    connections.push(RoomConnection { tile: grid[w - 1][y], dir: 1 });
                }
                if door_mask & DOOR_LEFT != 0 {
                    connections.push(RoomConnection { tile: grid[0][y], dir: 3 });
                }
            }
        }
        (false, false) => {
            if door_mask & DOOR_TOP != 0 {
                connections.push(RoomConnection { tile: grid[w / 2][0], dir: 0 });
            }
            if door_mask & DOOR_RIGHT != 0 {
                connections.push(RoomConnection { tile: grid[w - 1][h / 2], dir: 1 });
            }
            if door_mask & DOOR_BOTTOM != 0 {
                connections.push(RoomConnection { tile: grid[w / 2][h - 1], dir: 2 });
            }
            if door_mask & DOOR_LEFT != 0 {
                connections.push(RoomConnection { tile: grid[0][h / 2], dir: 3 });
            }
        }
    }

    Room {
        id: room_id,
        seed: grid[w / 2][h / 2],
        connections,
    }
}

/// An L-shaped room glued into a cone: an `h×h` "top" square and a
/// `2h×h` "bottom" rectangle. The top's south edge meets the first half
/// of the bottom's north edge; the top's east edge meets the second half
/// reversed. The gluing is deliberately non-planar, so a straight walk
/// over the apex comes out heading a different way than it went in.
///
/// Advertises up to three doors: the top square's north (`DOOR_TOP`) and
/// west (`DOOR_LEFT`) sides, and the bottom rectangle's south side
/// (`DOOR_BOTTOM`), each centered.
pub fn gen_conical_room(
    graph: &mut TileGraph,
    room_id: u16,
    height: usize,
    fg: Color,
    bg: Color,
    door_mask: u8,
) -> Room {
    assert!(height >= 1, "degenerate cone");
    let h = height;
    let top = gen_grid(graph, room_id, h, h, false, false, fg, bg);
    let bottom = gen_grid(graph, room_id, 2 * h, h, false, false, fg, bg);

    // First gluing: straight down off the top square continues onto the
    // bottom rectangle's left half.
    for x in 0..h {
        graph.link_opposite(top[x][h - 1], bottom[x][0], 2);
    }
    // Second gluing, reversed: walking east off the top square arrives on
    // the right half of the bottom's north edge, last column first.
    for y in 0..h {
        graph.link(top[h - 1][y], bottom[2 * h - 1 - y][0], 1, 0);
    }

    let mut connections = SmallVec::new();
    if door_mask & DOOR_TOP != 0 {
        connections.push(RoomConnection { tile: top[h / 2][0], dir: 0 });
    }
    if door_mask & DOOR_BOTTOM != 0 {
        connections.push(RoomConnection { tile: bottom[h][h - 1], dir: 2 });
    }
    if door_mask & DOOR_LEFT != 0 {
        connections.push(RoomConnection { tile: top[0][h / 2], dir: 3 });
    }

    Room {
        id: room_id,
        seed: bottom[h][h / 2],
        connections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::tile::ROOM_BASE;

    #[test]
    fn test_square_room_dimensions_and_decoration() {
        let mut graph = TileGraph::new();
        let room = gen_square_room(
            &mut graph,
            ROOM_BASE,
            4,
            3,
            false,
            false,
            Color::WHITE,
            Color::BLACK,
            DOOR_ALL,
        );
        assert_eq!(graph.len(), 12);
        assert_eq!(room.connections.len(), 4);
        for (_, tile) in graph.iter() {
            assert_eq!(tile.room_id, ROOM_BASE);
            assert!(tile.glyph == "." || tile.glyph == ",");
        }
        graph.assert_reciprocal();
    }

    #[test]
    fn test_square_room_interior_links() {
        let mut graph = TileGraph::new();
        let room = gen_square_room(
            &mut graph,
            ROOM_BASE,
            3,
            3,
            false,
            false,
            Color::WHITE,
            Color::BLACK,
            DOOR_ALL,
        );
        // Seed is the centroid: all four horizontal edges linked.
        for d in 0..4u8 {
            assert!(graph.neighbor(room.seed, d).is_some(), "centroid missing edge {d}");
        }
        // Walking east twice from the west-center door tile crosses the room.
        let west = room
            .connections
            .iter()
            .find(|c| c.dir == 3)
            .expect("west door");
        let mid = graph.neighbor(west.tile, 1).unwrap().to;
        assert_eq!(mid, room.seed);
    }

    #[test]
    fn test_square_room_wraparound_cylinder() {
        let mut graph = TileGraph::new();
        let room = gen_square_room(
            &mut graph,
            ROOM_BASE,
            4,
            4,
            true,
            false,
            Color::WHITE,
            Color::BLACK,
            DOOR_ALL,
        );
        // The rightmost column's east links land on the leftmost column,
        // arriving through its west edge.
        let mut east_ids = Vec::new();
        for (id, tile) in graph.iter() {
            let east = tile.links[1].expect("every tile wraps east");
            assert_eq!(east.back, 3);
            east_ids.push((id, east.to));
        }
        assert_eq!(east_ids.len(), 16);
        // No doors east/west; doors only north/south, two per side.
        assert_eq!(room.connections.len(), 4);
        assert!(room.connections.iter().all(|c| c.dir == 0 || c.dir == 2));
        for c in &room.connections {
            assert!(graph.neighbor(c.tile, c.dir).is_none());
        }
        graph.assert_reciprocal();
    }

    #[test]
    fn test_torus_has_no_doors() {
        let mut graph = TileGraph::new();
        let room = gen_square_room(
            &mut graph,
            ROOM_BASE,
            4,
            4,
            true,
            true,
            Color::WHITE,
            Color::BLACK,
            DOOR_ALL,
        );
        assert!(room.connections.is_empty());
        // Every edge of every tile is linked.
        for (_, tile) in graph.iter() {
            for d in 0..4 {
                assert!(tile.links[d].is_some());
            }
        }
        graph.assert_reciprocal();
    }

    #[test]
    fn test_narrow_cylinder_centers_its_doors() {
        let mut graph = TileGraph::new();
        let room = gen_square_room(
            &mut graph,
            ROOM_BASE,
            3,
            5,
            true,
            false,
            Color::WHITE,
            Color::BLACK,
            DOOR_TOP | DOOR_BOTTOM,
        );
        // Side length 3: the thirds collapse to one centered door per side.
        assert_eq!(room.connections.len(), 2);
    }

    #[test]
    fn test_door_mask_gates_sides() {
        let mut graph = TileGraph::new();
        let room = gen_square_room(
            &mut graph,
            ROOM_BASE,
            4,
            4,
            false,
            false,
            Color::WHITE,
            Color::BLACK,
            DOOR_TOP | DOOR_LEFT,
        );
        assert_eq!(room.connections.len(), 2);
        assert!(room.connections.iter().any(|c| c.dir == 0));
        assert!(room.connections.iter().any(|c| c.dir == 3));
    }

    #[test]
    fn test_one_by_one_wrapped_room_links_to_itself() {
        let mut graph = TileGraph::new();
        gen_square_room(
            &mut graph,
            ROOM_BASE,
            1,
            1,
            true,
            false,
            Color::WHITE,
            Color::BLACK,
            0,
        );
        assert_eq!(graph.len(), 1);
        let (id, tile) = graph.iter().next().unwrap();
        assert_eq!(tile.links[1].unwrap().to, id);
        assert_eq!(tile.links[3].unwrap().to, id);
        graph.assert_reciprocal();
    }

    #[test]
    fn test_conical_room_tile_count_and_doors() {
        let mut graph = TileGraph::new();
        let room = gen_conical_room(
            &mut graph,
            ROOM_BASE,
            3,
            Color::WHITE,
            Color::BLACK,
            DOOR_ALL,
        );
        // h*h top + 2h*h bottom.
        assert_eq!(graph.len(), 9 + 18);
        assert_eq!(room.connections.len(), 3);
        for c in &room.connections {
            assert!(graph.neighbor(c.tile, c.dir).is_none());
        }
        graph.assert_reciprocal();
    }

    #[test]
    fn test_conical_gluing_is_twisted() {
        let mut graph = TileGraph::new();
        let room = gen_conical_room(
            &mut graph,
            ROOM_BASE,
            2,
            Color::WHITE,
            Color::BLACK,
            DOOR_TOP,
        );
        // The top door tile is top[1][0]. Walking east from the top
        // square's last column arrives through the bottom's NORTH edge,
        // not its west edge: direction is not preserved over the seam.
        let door = room.connections[0].tile; // top[1][0]
        let east = graph.neighbor(door, 1).expect("apex seam link");
        assert_eq!(east.back, 0, "seam must arrive through the north edge");
        graph.assert_reciprocal();
    }
}
