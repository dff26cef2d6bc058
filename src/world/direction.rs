//! Direction algebra for the six edges of a tile.
//!
//! Edges 0..4 form the horizontal ring, 4 and 5 are the vertical pair. The
//! world is non-Euclidean, so "north" etc. are mnemonics only: if it helps,
//! read a tile's link array as N=0, E=1, S=2, W=3, up=4, down=5.

/// `OPPOSITE[d]` is the edge facing `d`. An involution.
pub const OPPOSITE: [u8; 6] = [2, 3, 0, 1, 5, 4];

/// Quarter-turn clockwise around the vertical axis, viewed top-down.
pub const ROTATE_CW: [u8; 6] = [1, 2, 3, 0, 1, 3];

/// Quarter-turn counter-clockwise. Going around a corner from a vertical
/// edge lands you on a canonical horizontal edge; which one you are
/// "facing" after a vertical traversal is not tracked, so entries 4 and 5
/// fold onto 1 and 3.
pub const ROTATE_CCW: [u8; 6] = [3, 0, 1, 2, 3, 1];

pub fn opposite(d: u8) -> u8 {
    OPPOSITE[d as usize]
}

pub fn rotate_cw(d: u8) -> u8 {
    ROTATE_CW[d as usize]
}

pub fn rotate_ccw(d: u8) -> u8 {
    ROTATE_CCW[d as usize]
}

/// Resolve a relative turn against the edge we entered by, yielding the
/// edge to leave through. `came_from` is absolute (an index into the link
/// array); `turn` is a signed quarter-turn delta in `[-3, 3]`.
///
/// Rotation is modulo 4, so callers may pass raw signed deltas: `-1` and
/// `+3` both mean counter-clockwise, `±2` both mean reverse.
pub fn relative(came_from: u8, turn: i8) -> u8 {
    debug_assert!(came_from < 6);
    match turn {
        0 => opposite(came_from),
        1 | -3 => rotate_cw(came_from),
        -1 | 3 => rotate_ccw(came_from),
        2 | -2 => came_from,
        _ => panic!("relative turn must be in [-3, 3], was {turn}"),
    }
}

/// Arrow glyph for the four horizontal directions, for debug output.
#[allow(dead_code)]
pub fn arrow_char(d: u8) -> char {
    match d {
        0 => '\u{2191}', // ↑
        1 => '\u{2192}', // →
        2 => '\u{2193}', // ↓
        3 => '\u{2190}', // ←
        4 => '\u{21A5}', // ↥
        5 => '\u{21A7}', // ↧
        _ => panic!("direction index out of range: {d}"),
    }
}
