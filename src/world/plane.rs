//! A plane of existence: the owning collection of tiles and entities,
//! grouped into rooms joined by hallways.

use std::fmt;

use crate::entity::{Component, EntityId, EntityStore};
use crate::render::color::Color;

use super::dice::Dice;
use super::graph::TileGraph;
use super::hallways::{self, HallStyle};
use super::rooms::{self, Room, RoomConnection, DOOR_ALL};
use super::tile::{TileId, ROOM_BASE};

/// How many times to re-roll a room pick before giving up on an extra
/// interlink.
const INTERLINK_TRIES: usize = 10;

pub struct Plane {
    graph: TileGraph,
    entities: EntityStore,
    rooms: Vec<Room>,
    dice: Dice,
    player: EntityId,
}

impl Plane {
    /// Generate a world. The result is a pure function of the inputs:
    /// the same `(seed, num_rooms)` always yields the same graph, up to
    /// tile id renumbering.
    pub fn generate(seed: u64, num_rooms: usize) -> Self {
        assert!(num_rooms >= 1, "a plane needs at least one room");

        let mut graph = TileGraph::new();
        let mut dice = Dice::new(seed);
        let mut rooms = Vec::with_capacity(num_rooms);

        for i in 0..num_rooms {
            let mut room = gen_room(&mut graph, &mut dice, ROOM_BASE + i as u16);
            dice.shuffle(&mut room.connections);
            rooms.push(room);
        }
        assert_connections_free(&graph, &rooms, "room generation");

        // Thread the rooms onto one chain of hallways.
        for i in 1..num_rooms {
            let a = rooms[i - 1]
                .connections
                .pop()
                .expect("chained room ran out of doors");
            let b = rooms[i]
                .connections
                .pop()
                .expect("chained room ran out of doors");
            splice_hallway(&mut graph, &mut dice, a, b);
        }
        assert_connections_free(&graph, &rooms, "hallway chaining");

        // A few extra interlinks so the world isn't a corridor of pearls.
        if num_rooms >= 2 {
            let extra = num_rooms.div_ceil(4);
            for _ in 0..extra {
                let Some((a, b)) = pick_interlink(&mut dice, &mut rooms) else {
                    log::warn!("no spare doorways left, skipping remaining interlinks");
                    break;
                };
                splice_hallway(&mut graph, &mut dice, a, b);
            }
            assert_connections_free(&graph, &rooms, "interlinking");
        }

        let mut entities = EntityStore::new();
        let player = entities.spawn();
        entities.add_component(player, Component::existence("@", Color::hex(0xDDA24E)));
        entities.add_component(player, Component::fragility(10));
        graph.tile_mut(rooms[0].seed).occupants.push(player);

        log::debug!(
            "generated plane: {} tiles, {} rooms, seed {seed}",
            graph.len(),
            rooms.len()
        );

        Plane {
            graph,
            entities,
            rooms,
            dice,
            player,
        }
    }

    #[allow(dead_code)]
    pub fn graph(&self) -> &TileGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut TileGraph {
        &mut self.graph
    }

    #[allow(dead_code)]
    pub fn entities_mut(&mut self) -> &mut EntityStore {
        &mut self.entities
    }

    /// Split borrow for rendering: the view reads the graph while
    /// occupants are dispatched mutably.
    pub fn view_parts(&mut self) -> (&TileGraph, &mut EntityStore) {
        (&self.graph, &mut self.entities)
    }

    #[allow(dead_code)]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    #[allow(dead_code)]
    pub fn player(&self) -> EntityId {
        self.player
    }

    /// Where a fresh view is seated: the first room's centroid.
    pub fn starting_tile(&self) -> TileId {
        self.rooms[0].seed
    }

    /// A number 𝑛 such that `0 ≤ 𝑛 < max`.
    #[allow(dead_code)]
    pub fn d(&mut self, max: i32) -> i32 {
        self.dice.d(max)
    }

    /// A number 𝑛 such that `min ≤ 𝑛 < max`.
    #[allow(dead_code)]
    pub fn d_range(&mut self, min: i32, max: i32) -> i32 {
        self.dice.d_range(min, max)
    }

    /// A real 𝑥 such that `0 ≤ 𝑥 < max`.
    #[allow(dead_code)]
    pub fn df(&mut self, max: f64) -> f64 {
        self.dice.df(max)
    }

    /// A real 𝑥 such that `min ≤ 𝑥 < max`.
    #[allow(dead_code)]
    pub fn df_range(&mut self, min: f64, max: f64) -> f64 {
        self.dice.df_range(min, max)
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Plane ({} rooms):", self.rooms.len())?;
        let mut on_line = 0;
        for (_, tile) in self.graph.iter() {
            write!(f, "\t{} (", tile.id_no)?;
            let mut any = false;
            for (d, slot) in tile.links.iter().enumerate() {
                if let Some(link) = slot {
                    if any {
                        write!(f, " ")?;
                    }
                    write!(f, "{}→{}", d, self.graph.tile(link.to).id_no)?;
                    any = true;
                }
            }
            if !any {
                write!(f, "isolated")?;
            }
            write!(f, ")")?;
            on_line += 1;
            if on_line % 5 == 0 {
                writeln!(f)?;
            }
        }
        if on_line % 5 != 0 {
            writeln!(f)?;
        }
        Ok(())
    }
}

fn gen_room(graph: &mut TileGraph, dice: &mut Dice, room_id: u16) -> Room {
    let conical = dice.d(3) == 0;
    let fg = Color::hsluv(
        dice.df(360.0),
        dice.df_range(40.0, 80.0),
        dice.df_range(60.0, 90.0),
    );
    let bg = Color::hsluv(
        dice.df(360.0),
        dice.df_range(20.0, 60.0),
        dice.df_range(3.0, 12.0),
    );
    if conical {
        let height = dice.d_range(2, 9) as usize;
        rooms::gen_conical_room(graph, room_id, height, fg, bg, DOOR_ALL)
    } else {
        let w = dice.d_range(2, 9) as usize;
        let h = dice.d_range(2, 9) as usize;
        let wrap_x = dice.d(4) == 0;
        rooms::gen_square_room(graph, room_id, w, h, wrap_x, false, fg, bg, DOOR_ALL)
    }
}

/// Roll a hallway and weld its two ends onto the given room connections,
/// carrying all four direction indices.
fn splice_hallway(graph: &mut TileGraph, dice: &mut Dice, a: RoomConnection, b: RoomConnection) {
    let (length, style) = if dice.d(2) == 0 {
        (1, HallStyle::Straight)
    } else {
        let style = HallStyle::roll(dice);
        let length = (dice.d_range(4, 10) + dice.d_range(4, 10)) / 2;
        (length as usize, style)
    };
    let fg = Color::hsluv(0.0, 0.0, 45.0);
    let hall = hallways::gen_hallway(graph, dice, length, style, fg, Color::BLACK);
    graph.link(a.tile, hall.ends[0].tile, a.dir, hall.ends[0].dir);
    graph.link(b.tile, hall.ends[1].tile, b.dir, hall.ends[1].dir);
}

/// Pick two rooms with spare doorways for an extra interlink, rejecting
/// rooms with no free connections and the same-room case when it cannot
/// spare two. Pops and returns both connections on success.
fn pick_interlink(dice: &mut Dice, rooms: &mut [Room]) -> Option<(RoomConnection, RoomConnection)> {
    let n = rooms.len() as i32;

    let mut first = None;
    for _ in 0..INTERLINK_TRIES {
        let idx = dice.d(n) as usize;
        if !rooms[idx].connections.is_empty() {
            first = Some(idx);
            break;
        }
    }
    let first = first?;

    let mut second = None;
    for _ in 0..INTERLINK_TRIES {
        let idx = dice.d(n) as usize;
        if rooms[idx].connections.is_empty() {
            continue;
        }
        if idx == first && rooms[idx].connections.len() < 2 {
            continue;
        }
        second = Some(idx);
        break;
    }
    let second = second?;

    let a = rooms[first].connections.pop()?;
    let b = rooms[second].connections.pop()?;
    Some((a, b))
}

/// Every remaining room connection must still point at an absent link;
/// anything else means generation wired a door twice.
fn assert_connections_free(graph: &TileGraph, rooms: &[Room], phase: &str) {
    for room in rooms {
        for c in &room.connections {
            assert!(
                graph.neighbor(c.tile, c.dir).is_none(),
                "room {} connection {} occupied after {phase}: {}",
                room.id,
                c.dir,
                graph.list_links(c.tile, Some(c.dir)),
            );
        }
    }
}
