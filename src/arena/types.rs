use std::{fmt, slice::Iter};

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn iter() -> Iter<'static, Direction> {
        static DIRECTIONS: [Direction; 4] = [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ];
        DIRECTIONS.iter()
    }

    /// Position of this direction in [`Direction::iter`], for
    /// direction-keyed arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    #[must_use]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// The two directions perpendicular to this one.
    #[must_use]
    pub const fn laterals(self) -> [Direction; 2] {
        match self {
            Direction::Up | Direction::Down => {
                [Direction::Left, Direction::Right]
            },
            Direction::Left | Direction::Right => {
                [Direction::Up, Direction::Down]
            },
        }
    }

    #[must_use]
    pub const fn offset(self) -> (i64, i64) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    #[must_use]
    pub fn between(from: Coord, to: Coord) -> Option<Direction> {
        // gets the most significant direction between two coordinates.
        // y grows downwards, so a positive dy means down.
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        if dx.abs() > dy.abs() {
            match dx.signum() {
                1 => Some(Direction::Right),
                -1 => Some(Direction::Left),
                _ => None,
            }
        } else {
            match dy.signum() {
                1 => Some(Direction::Down),
                -1 => Some(Direction::Up),
                _ => None,
            }
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Direction::Left => "Left",
                Direction::Right => "Right",
                Direction::Up => "Up",
                Direction::Down => "Down",
            }
        )
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Coord {
    pub x: i64,
    pub y: i64,
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Coord {
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn translate(self, dx: i64, dy: i64) -> Coord {
        Coord {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    #[must_use]
    pub const fn neighbour(self, direction: Direction) -> Coord {
        let (dx, dy) = direction.offset();
        self.translate(dx, dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn down_grows_y() {
        let c = Coord::new(3, 3);
        assert_eq!(c.neighbour(Direction::Down), Coord::new(3, 4));
        assert_eq!(c.neighbour(Direction::Up), Coord::new(3, 2));
        assert_eq!(c.neighbour(Direction::Left), Coord::new(2, 3));
        assert_eq!(c.neighbour(Direction::Right), Coord::new(4, 3));
    }

    #[test]
    fn between_follows_neighbour() {
        let c = Coord::new(5, 5);
        for &d in Direction::iter() {
            assert_eq!(Direction::between(c, c.neighbour(d)), Some(d));
        }
        assert_eq!(Direction::between(c, c), None);
    }

    #[test]
    fn index_matches_iteration_order() {
        for (i, &d) in Direction::iter().enumerate() {
            assert_eq!(d.index(), i);
        }
    }

    #[test]
    fn laterals_are_perpendicular() {
        for &d in Direction::iter() {
            for lateral in d.laterals() {
                assert_ne!(lateral, d);
                assert_ne!(lateral, d.opposite());
            }
        }
    }
}
