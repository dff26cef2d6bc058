//! Hallway generator: a chain of tiles whose successive link directions
//! follow a per-hall step function, yielding straight runs, zig-zags,
//! spirals, and staircases through the vertical edges.

use super::dice::Dice;
use super::direction::opposite;
use super::graph::TileGraph;
use super::rooms::RoomConnection;
use super::tile::{Tile, TileId, ROOM_HALLWAY};
use crate::render::color::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HallStyle {
    Straight,
    ZigZag,
    SpiralCw,
    SpiralCcw,
    Irregular,
}

impl HallStyle {
    pub fn roll(dice: &mut Dice) -> Self {
        match dice.d(5) {
            0 => HallStyle::Straight,
            1 => HallStyle::ZigZag,
            2 => HallStyle::SpiralCw,
            3 => HallStyle::SpiralCcw,
            _ => HallStyle::Irregular,
        }
    }
}

/// The canonical curve table: seven six-step patterns cycled along the
/// hall, from tight turns to long straights, the last two climbing and
/// descending through the vertical pair. No pattern ever follows a step
/// with its opposite, so a chain can always keep linking.
const SPIRAL_PATTERNS: [[u8; 6]; 7] = [
    [1, 2, 1, 2, 1, 2], // tight spiral
    [1, 1, 2, 2, 1, 1], // small spiral
    [1, 1, 2, 1, 1, 2], // medium spiral
    [1, 1, 1, 1, 1, 2], // large spiral
    [1, 2, 2, 1, 2, 2], // skewed spiral
    [1, 4, 1, 4, 1, 4], // staircase up
    [1, 5, 1, 5, 1, 5], // staircase down
];

const ZIGZAG_PATTERNS: [&[u8]; 2] = [&[0, 1], &[0, 1, 0]];

/// Mirror a horizontal direction for counter-clockwise variants; the
/// vertical pair is unchanged.
fn mirror(d: u8) -> u8 {
    if d < 4 {
        (4 - d) % 4
    } else {
        d
    }
}

/// Per-hall step function. Captured parameters are rolled once, so the
/// whole hall shares one consistent squiggle.
enum Stepper {
    Straight,
    ZigZag { pattern: &'static [u8], mirrored: bool },
    Spiral { pattern: [u8; 6] },
    Irregular,
}

impl Stepper {
    fn roll(style: HallStyle, dice: &mut Dice) -> Self {
        match style {
            HallStyle::Straight => Stepper::Straight,
            HallStyle::ZigZag => Stepper::ZigZag {
                pattern: ZIGZAG_PATTERNS[dice.d(2) as usize],
                mirrored: dice.d(2) == 1,
            },
            HallStyle::SpiralCw | HallStyle::SpiralCcw => {
                let curve = dice.d(SPIRAL_PATTERNS.len() as i32) as usize;
                let mut pattern = SPIRAL_PATTERNS[curve];
                if style == HallStyle::SpiralCcw {
                    for d in &mut pattern {
                        *d = mirror(*d);
                    }
                }
                Stepper::Spiral { pattern }
            }
            HallStyle::Irregular => Stepper::Irregular,
        }
    }

    /// Direction of link `i` of `n`, drawing from the dice only in the
    /// irregular style.
    fn step(&self, dice: &mut Dice, i: usize, n: usize) -> u8 {
        match self {
            Stepper::Straight => 1,
            Stepper::ZigZag { pattern, mirrored } => {
                let d = pattern[i * pattern.len() / n];
                if *mirrored {
                    mirror(d)
                } else {
                    d
                }
            }
            Stepper::Spiral { pattern } => pattern[i % pattern.len()],
            Stepper::Irregular => dice.d(2) as u8,
        }
    }
}

/// A finished hallway: its tiles in walk order, and the two free
/// connections at its extremities.
#[derive(Clone, Debug)]
pub struct Hall {
    pub tiles: Vec<TileId>,
    pub ends: [RoomConnection; 2],
}

pub fn gen_hallway(
    graph: &mut TileGraph,
    dice: &mut Dice,
    length: usize,
    style: HallStyle,
    fg: Color,
    bg: Color,
) -> Hall {
    gen_hallway_wide(graph, dice, length, 1, style, fg, bg)
}

/// A chain of `length·width` tiles linked head-to-tail. The front of the
/// first tile and the continuation of the last are left free.
pub fn gen_hallway_wide(
    graph: &mut TileGraph,
    dice: &mut Dice,
    length: usize,
    width: usize,
    style: HallStyle,
    fg: Color,
    bg: Color,
) -> Hall {
    let n = length * width;
    assert!(n >= 1, "degenerate hallway");
    let stepper = Stepper::roll(style, dice);

    let tiles: Vec<TileId> = (0..n)
        .map(|i| {
            graph.add(Tile {
                room_id: ROOM_HALLWAY,
                glyph: if i % 2 == 1 { "," } else { "." },
                fg_color: fg,
                bg_color: bg,
                ..Tile::default()
            })
        })
        .collect();

    let dirs: Vec<u8> = (0..n).map(|i| stepper.step(dice, i, n)).collect();
    for i in 0..n - 1 {
        graph.link_opposite(tiles[i], tiles[i + 1], dirs[i]);
    }

    Hall {
        ends: [
            RoomConnection {
                tile: tiles[0],
                dir: opposite(dirs[0]),
            },
            RoomConnection {
                tile: tiles[n - 1],
                dir: dirs[n - 1],
            },
        ],
        tiles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gen(length: usize, style: HallStyle, seed: u64) -> (TileGraph, Hall) {
        let mut graph = TileGraph::new();
        let mut dice = Dice::new(seed);
        let hall = gen_hallway(
            &mut graph,
            &mut dice,
            length,
            style,
            Color::WHITE,
            Color::BLACK,
        );
        (graph, hall)
    }

    #[test]
    fn test_straight_hallway_shape() {
        let (graph, hall) = gen(3, HallStyle::Straight, 0);
        let &[a, b, c] = &hall.tiles[..] else { panic!() };
        assert_eq!(graph.neighbor(a, 1).unwrap().to, b);
        assert_eq!(graph.neighbor(b, 3).unwrap().to, a);
        assert_eq!(graph.neighbor(b, 1).unwrap().to, c);
        assert_eq!(graph.neighbor(c, 3).unwrap().to, b);
        assert_eq!(hall.ends[0], RoomConnection { tile: a, dir: 3 });
        assert_eq!(hall.ends[1], RoomConnection { tile: c, dir: 1 });
        graph.assert_reciprocal();
    }

    #[test]
    fn test_length_one_hallway_has_front_and_back() {
        let (graph, hall) = gen(1, HallStyle::Straight, 0);
        assert_eq!(hall.tiles.len(), 1);
        let t = hall.tiles[0];
        assert_eq!(hall.ends[0], RoomConnection { tile: t, dir: 3 });
        assert_eq!(hall.ends[1], RoomConnection { tile: t, dir: 1 });
        assert!(graph.neighbor(t, 1).is_none());
        assert!(graph.neighbor(t, 3).is_none());
    }

    #[test]
    fn test_ends_are_free_for_every_style() {
        for style in [
            HallStyle::Straight,
            HallStyle::ZigZag,
            HallStyle::SpiralCw,
            HallStyle::SpiralCcw,
            HallStyle::Irregular,
        ] {
            for seed in 0..20 {
                let (graph, hall) = gen(9, style, seed);
                for end in &hall.ends {
                    assert!(
                        graph.neighbor(end.tile, end.dir).is_none(),
                        "{style:?} seed {seed} blocked its own end"
                    );
                }
                graph.assert_reciprocal();
            }
        }
    }

    #[test]
    fn test_hall_tiles_are_marked_hallway() {
        let (graph, hall) = gen(5, HallStyle::ZigZag, 3);
        for &t in &hall.tiles {
            assert_eq!(graph.tile(t).room_id, ROOM_HALLWAY);
        }
    }

    #[test]
    fn test_wide_hallway_multiplies_tile_count() {
        let mut graph = TileGraph::new();
        let mut dice = Dice::new(0);
        let hall = gen_hallway_wide(
            &mut graph,
            &mut dice,
            4,
            2,
            HallStyle::Straight,
            Color::WHITE,
            Color::BLACK,
        );
        assert_eq!(hall.tiles.len(), 8);
        assert_eq!(graph.len(), 8);
    }

    /// Outgoing link directions of a hall, in walk order.
    fn step_dirs(graph: &TileGraph, hall: &Hall) -> Vec<u8> {
        hall.tiles
            .windows(2)
            .map(|w| {
                (0..6u8)
                    .find(|&d| graph.neighbor(w[0], d).is_some_and(|l| l.to == w[1]))
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_zigzag_shares_one_squiggle() {
        // All step directions come from a single pattern/mirror roll:
        // either {0,1} or {0,3}, never both 1 and 3 in one hall.
        for seed in 0..20 {
            let (graph, hall) = gen(9, HallStyle::ZigZag, seed);
            let dirs = step_dirs(&graph, &hall);
            assert!(
                dirs.iter().all(|&d| d == 0 || d == 1)
                    || dirs.iter().all(|&d| d == 0 || d == 3),
                "seed {seed}: mixed zigzag dirs {dirs:?}"
            );
        }
    }

    #[test]
    fn test_spiral_ccw_mirrors_cw() {
        // With the same seed both spirals roll the same curve index, so
        // their step sequences are mirror images.
        let (graph_cw, hall_cw) = gen(7, HallStyle::SpiralCw, 11);
        let (graph_ccw, hall_ccw) = gen(7, HallStyle::SpiralCcw, 11);
        let cw = step_dirs(&graph_cw, &hall_cw);
        let ccw = step_dirs(&graph_ccw, &hall_ccw);
        assert_eq!(ccw, cw.iter().map(|&d| mirror(d)).collect::<Vec<_>>());
    }

    #[test]
    fn test_irregular_is_deterministic_per_seed() {
        let (graph_a, hall_a) = gen(9, HallStyle::Irregular, 42);
        let (graph_b, hall_b) = gen(9, HallStyle::Irregular, 42);
        for (&ta, &tb) in hall_a.tiles.iter().zip(&hall_b.tiles) {
            let la: Vec<bool> = graph_a.tile(ta).links.iter().map(Option::is_some).collect();
            let lb: Vec<bool> = graph_b.tile(tb).links.iter().map(Option::is_some).collect();
            assert_eq!(la, lb);
        }
    }
}
