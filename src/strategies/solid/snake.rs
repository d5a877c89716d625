use std::collections::{HashSet, VecDeque};

use color_eyre::{eyre::eyre, Result};

use crate::arena::types::{Coord, Direction};

pub type SnakeID = String;

#[derive(Clone, Debug)]
pub struct Snake {
    pub id:        SnakeID,
    pub body:      VecDeque<Coord>,
    pub body_set:  HashSet<Coord>,
    pub heading:   Direction,
    /// The tail stays put on the next step.
    pub has_eaten: bool,
    pub born:      u64,
}

impl Snake {
    /// Builds a snake from its reported positions, head first.
    ///
    /// # Errors
    ///
    /// Fails when `body` is empty.
    pub fn new(
        id: SnakeID,
        body: impl IntoIterator<Item = Coord>,
        born: u64,
    ) -> Result<Self> {
        let body: VecDeque<_> = body.into_iter().collect();
        if body.is_empty() {
            return Err(eyre!("snake {id} has no body"));
        }

        let heading = Self::facing(&body).unwrap_or(Direction::Down);
        Ok(Self {
            id,
            body_set: body.iter().copied().collect(),
            body,
            heading,
            has_eaten: false,
            born,
        })
    }

    fn facing(body: &VecDeque<Coord>) -> Option<Direction> {
        match (body.front(), body.get(1)) {
            (Some(head), Some(neck)) => Direction::between(*neck, *head),
            _ => None,
        }
    }

    pub fn head(&self) -> Coord {
        self.body[0]
    }

    pub fn tail(&self) -> Coord {
        self.body[self.body.len() - 1]
    }

    /// True when the snake would keep its tail on the step into
    /// `next_tick`.
    pub fn keeps_tail(
        &self,
        next_tick: u64,
        growth_interval: Option<u64>,
    ) -> bool {
        self.has_eaten
            || growth_interval.map_or(false, |interval| {
                interval > 0
                    && next_tick > self.born
                    && (next_tick - self.born) % interval == 0
            })
    }

    /// Moves the head one step in `direction`, dropping the tail unless
    /// `grow` is set.
    pub fn advance(&mut self, direction: Direction, grow: bool) {
        let head = self.head().neighbour(direction);
        self.body.push_front(head);
        self.body_set.insert(head);
        if !grow {
            if let Some(tail) = self.body.pop_back() {
                if !self.body.contains(&tail) {
                    self.body_set.remove(&tail);
                }
            }
        }
        self.heading = direction;
        self.has_eaten = false;
    }
}

impl PartialEq for Snake {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
