//! Cardinal remapping of root tile addresses.
//!
//! Four independently generated quadrant mosaics are stitched into one
//! global grid by rotating their root addresses in 90-degree steps. The
//! grid spans `2 * 2^12` tiles per axis, so a rotation of address `(x, y)`
//! reflects against `GRID_MAX`.

use crate::util::{TileGenError, TileGenResult};
use std::str::FromStr;

/// Highest valid root tile coordinate on either axis.
pub const GRID_MAX: u32 = 2 * (1 << 12) - 1;

/// Cardinal orientation of a quadrant within the global mosaic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl FromStr for Direction {
    type Err = TileGenError;

    /// Accepts the single-letter legacy codes in either case, plus the
    /// full lowercase names. Anything else is an error; there is no
    /// silent fallback to north.
    fn from_str(s: &str) -> TileGenResult<Self> {
        match s {
            "n" | "N" | "north" => Ok(Direction::North),
            "e" | "E" | "east" => Ok(Direction::East),
            "s" | "S" | "south" => Ok(Direction::South),
            "w" | "W" | "west" => Ok(Direction::West),
            _ => Err(TileGenError::UnknownDirection {
                code: s.to_string(),
            }),
        }
    }
}

/// Rotates a root tile address into the canonical global addressing space.
///
/// North is the identity; east, south and west are successive 90-degree
/// rotations within the fixed `[0, GRID_MAX]` grid. Out-of-range inputs
/// fail before the reflection arithmetic can wrap.
pub fn map_root(x: u32, y: u32, direction: Direction) -> TileGenResult<(u32, u32)> {
    if x > GRID_MAX || y > GRID_MAX {
        return Err(TileGenError::InvalidRootTile { x, y });
    }
    Ok(match direction {
        Direction::North => (x, y),
        Direction::East => (y, GRID_MAX - x),
        Direction::South => (GRID_MAX - x, GRID_MAX - y),
        Direction::West => (GRID_MAX - y, x),
    })
}

#[cfg(test)]
mod tests {
    use super::{map_root, Direction, GRID_MAX};
    use crate::util::TileGenError;

    #[test]
    fn north_is_identity() {
        assert_eq!(map_root(17, 4242, Direction::North).unwrap(), (17, 4242));
    }

    #[test]
    fn south_is_self_inverse() {
        let (x1, y1) = map_root(123, 456, Direction::South).unwrap();
        assert_eq!(map_root(x1, y1, Direction::South).unwrap(), (123, 456));
    }

    #[test]
    fn east_twice_is_south() {
        let (x1, y1) = map_root(123, 456, Direction::East).unwrap();
        let twice = map_root(x1, y1, Direction::East).unwrap();
        assert_eq!(twice, map_root(123, 456, Direction::South).unwrap());
    }

    #[test]
    fn east_four_times_is_identity() {
        let mut p = (123u32, 456u32);
        for _ in 0..4 {
            p = map_root(p.0, p.1, Direction::East).unwrap();
        }
        assert_eq!(p, (123, 456));
    }

    #[test]
    fn east_and_west_rotate_opposite_ways() {
        let east = map_root(123, 456, Direction::East).unwrap();
        let west = map_root(123, 456, Direction::West).unwrap();
        assert_ne!(east, (123, 456));
        assert_ne!(east, west);
        assert_eq!(east, (456, GRID_MAX - 123));
        assert_eq!(west, (GRID_MAX - 456, 123));
    }

    #[test]
    fn rejects_out_of_grid_roots() {
        let err = map_root(GRID_MAX + 1, 0, Direction::North).unwrap_err();
        assert_eq!(
            err,
            TileGenError::InvalidRootTile {
                x: GRID_MAX + 1,
                y: 0,
            }
        );
    }

    #[test]
    fn parses_legacy_letter_codes() {
        assert_eq!("N".parse::<Direction>().unwrap(), Direction::North);
        assert_eq!("e".parse::<Direction>().unwrap(), Direction::East);
        assert_eq!("south".parse::<Direction>().unwrap(), Direction::South);
        assert!("x".parse::<Direction>().is_err());
        assert!("".parse::<Direction>().is_err());
    }
}
