use crate::arena::types::Coord;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Board {
    pub width:  i64,
    pub height: i64,
}

impl Board {
    pub const fn contains(&self, coord: Coord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.x < self.width
            && coord.y < self.height
    }

    pub const fn area(&self) -> usize {
        (self.width * self.height) as usize
    }

    pub const fn index(&self, coord: Coord) -> usize {
        (coord.y * self.width + coord.x) as usize
    }

    /// The coordinates sitting on either vertical edge.
    pub const fn on_side_edge(&self, coord: Coord) -> bool {
        coord.x == 0 || coord.x == self.width - 1
    }

    /// The coordinates sitting on either horizontal edge.
    pub const fn on_top_or_bottom_edge(&self, coord: Coord) -> bool {
        coord.y == 0 || coord.y == self.height - 1
    }
}
