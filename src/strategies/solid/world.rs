use std::{
    cell::OnceCell,
    collections::{HashSet, VecDeque},
    fmt,
    sync::Arc,
};

use color_eyre::{eyre::eyre, Result};
use log::trace;

use super::{board::Board, snake::Snake};
use crate::arena::{
    models::MapUpdate,
    types::{Coord, Direction},
};

/// Counts the cells reachable from `start` without crossing a blocked cell
/// or the board edge. `start` itself counts when it is free.
pub fn flood_fill(
    board: Board,
    start: Coord,
    is_blocked: impl Fn(Coord) -> bool,
) -> usize {
    if !board.contains(start) || is_blocked(start) {
        return 0;
    }

    let mut seen = vec![false; board.area()];
    let mut queue = VecDeque::from([start]);
    seen[board.index(start)] = true;

    let mut count = 0;
    while let Some(coord) = queue.pop_front() {
        count += 1;
        for &direction in Direction::iter() {
            let next = coord.neighbour(direction);
            if board.contains(next)
                && !seen[board.index(next)]
                && !is_blocked(next)
            {
                seen[board.index(next)] = true;
                queue.push_back(next);
            }
        }
    }
    count
}

/// A snapshot of the game as seen by the controlled snake.
///
/// Projections made with [`World::project`] are independent values: nothing
/// done to a projection reaches back into the world it came from.
#[derive(Clone, Debug)]
pub struct World {
    pub board:       Board,
    pub tick:        u64,
    pub you:         Snake,
    pub foes:        Vec<Snake>,
    pub obstacles:   Arc<HashSet<Coord>>,
    pub food:        HashSet<Coord>,
    occupied:        HashSet<Coord>,
    killed_foe:      bool,
    growth_interval: Option<u64>,
    open_spaces:     [OnceCell<usize>; 4],
}

impl World {
    pub fn new(
        board: Board,
        tick: u64,
        you: Snake,
        foes: Vec<Snake>,
        obstacles: Arc<HashSet<Coord>>,
        food: HashSet<Coord>,
        growth_interval: Option<u64>,
    ) -> Self {
        let mut world = Self {
            board,
            tick,
            you,
            foes,
            obstacles,
            food,
            occupied: HashSet::new(),
            killed_foe: false,
            growth_interval,
            open_spaces: Default::default(),
        };
        world.calculate_occupied();
        world
    }

    /// Builds the world from the first update of a game.
    ///
    /// # Errors
    ///
    /// Fails when the board is empty, the controlled snake is missing from
    /// the update or any reported coordinate lies off the board.
    pub fn from_update(
        update: &MapUpdate,
        growth_interval: Option<u64>,
    ) -> Result<Self> {
        let map = &update.map;
        if map.width <= 0 || map.height <= 0 {
            return Err(eyre!(
                "tick {} has an empty {}x{} board",
                update.game_tick,
                map.width,
                map.height
            ));
        }
        let board = Board {
            width:  map.width,
            height: map.height,
        };

        let obstacles = checked(board, map.obstacles())?;
        let you = Self::read_you(update, board)?;
        let foes = Self::read_foes(update, board)?;
        let food = checked(board, map.food())?;

        Ok(Self::new(
            board,
            update.game_tick,
            you,
            foes,
            Arc::new(obstacles.into_iter().collect()),
            food.into_iter().collect(),
            growth_interval,
        ))
    }

    /// Brings the world up to date with a later update of the same game.
    ///
    /// The controlled snake is rebuilt from its reported body but keeps its
    /// heading and eaten flag, which the update does not carry.
    ///
    /// A rejected update leaves the world as it was.
    ///
    /// # Errors
    ///
    /// Fails when the board size changed, otherwise the same as
    /// [`World::from_update`].
    pub fn refresh(&mut self, update: &MapUpdate) -> Result<()> {
        let map = &update.map;
        if map.width != self.board.width || map.height != self.board.height {
            return Err(eyre!(
                "tick {} reports a {}x{} board, expected {}x{}",
                update.game_tick,
                map.width,
                map.height,
                self.board.width,
                self.board.height
            ));
        }

        let mut you = Self::read_you(update, self.board)?;
        you.heading = self.you.heading;
        you.has_eaten = self.you.has_eaten;
        you.born = self.you.born;
        let foes = Self::read_foes(update, self.board)?;
        let food = checked(self.board, map.food())?;

        self.you = you;
        self.foes = foes;
        self.food = food.into_iter().collect();
        self.tick = update.game_tick;
        self.killed_foe = false;
        self.open_spaces = Default::default();
        self.calculate_occupied();
        Ok(())
    }

    /// Records the move sent for the controlled snake this tick.
    pub fn record_move(&mut self, direction: Direction, will_eat: bool) {
        self.you.heading = direction;
        self.you.has_eaten = will_eat;
        self.open_spaces = Default::default();
    }

    fn read_you(update: &MapUpdate, board: Board) -> Result<Snake> {
        let map = &update.map;
        let info = map
            .snake_infos
            .iter()
            .find(|info| info.id == update.receiving_player_id)
            .ok_or_else(|| {
                eyre!(
                    "player {} is missing from tick {}",
                    update.receiving_player_id,
                    update.game_tick
                )
            })?;

        let body = checked(board, map.coords_of(&info.positions))?;
        Snake::new(info.id.clone(), body, 0)
    }

    fn read_foes(update: &MapUpdate, board: Board) -> Result<Vec<Snake>> {
        let map = &update.map;
        map.snake_infos
            .iter()
            .filter(|info| {
                info.id != update.receiving_player_id && info.is_alive()
            })
            .map(|info| {
                let body = checked(board, map.coords_of(&info.positions))?;
                Snake::new(info.id.clone(), body, update.game_tick)
            })
            .collect()
    }

    fn calculate_occupied(&mut self) {
        self.occupied.clear();
        self.occupied.extend(self.obstacles.iter().copied());
        self.occupied.extend(self.you.body.iter().copied());
        for foe in &self.foes {
            self.occupied.extend(foe.body.iter().copied());
        }

        debug_assert!(
            self.occupied.iter().all(|c| self.board.contains(*c)),
            "occupied set reaches outside the board"
        );
    }

    /// Every coordinate covered by a snake or an obstacle.
    pub const fn total_set(&self) -> &HashSet<Coord> {
        &self.occupied
    }

    /// True when the step that produced this world put our head on the
    /// tile straight ahead of a foe.
    pub const fn killed_foe(&self) -> bool {
        self.killed_foe
    }

    /// The controlled snake's tail, when it will be freed on the next step.
    /// A lone head is never its own tail.
    fn vacating_tail(&self) -> Option<Coord> {
        vacating_tail(&self.you, self.tick + 1, self.growth_interval)
    }

    fn is_blocked(&self, coord: Coord) -> bool {
        self.occupied.contains(&coord) && Some(coord) != self.vacating_tail()
    }

    pub fn can_move(&self, direction: Direction) -> bool {
        let target = self.you.head().neighbour(direction);
        self.board.contains(target) && !self.is_blocked(target)
    }

    /// Size of the open area entered by stepping once in `direction`.
    pub fn open_spaces(&self, direction: Direction) -> usize {
        *self.open_spaces[direction.index()].get_or_init(|| {
            let tail = self.vacating_tail();
            flood_fill(
                self.board,
                self.you.head().neighbour(direction),
                |c| self.occupied.contains(&c) && Some(c) != tail,
            )
        })
    }

    /// The legal direction opening onto the most space, first one winning
    /// ties.
    pub fn most_open_direction(&self) -> Option<Direction> {
        let mut best = None;
        let mut most_open_spaces = 0;
        for &direction in Direction::iter() {
            if !self.can_move(direction) {
                continue;
            }
            let open_spaces = self.open_spaces(direction);
            if open_spaces > most_open_spaces {
                most_open_spaces = open_spaces;
                best = Some(direction);
            }
        }
        best
    }

    /// Predicts the world one tick ahead with the controlled snake moving
    /// in `direction`.
    ///
    /// Foes keep their heading when they can, otherwise they turn towards
    /// whichever legal heading opens onto the most space. Foes left with no
    /// legal move are dropped. Stepping onto the tile straight ahead of a
    /// foe counts as a kill, even when the foe can still turn away.
    pub fn project(&self, direction: Direction) -> World {
        let next_tick = self.tick + 1;

        let mut you = self.you.clone();
        let grow = you.keeps_tail(next_tick, self.growth_interval);
        you.advance(direction, grow);
        debug_assert!(
            self.board.contains(you.head()),
            "projected a move off the board"
        );

        // foes see our new body along with everyone's current body
        let mut blocked: HashSet<Coord> =
            self.obstacles.iter().copied().collect();
        blocked.extend(you.body.iter().copied());
        for foe in &self.foes {
            blocked.extend(foe.body.iter().copied());
        }

        let mut food = self.food.clone();
        if food.remove(&you.head()) {
            you.has_eaten = true;
        }

        let mut killed_foe = false;
        let mut foes = Vec::with_capacity(self.foes.len());
        for foe in &self.foes {
            let foe_grows = foe.keeps_tail(next_tick, self.growth_interval);
            let tail = vacating_tail(foe, next_tick, self.growth_interval);
            let free = |c: Coord| {
                self.board.contains(c)
                    && (!blocked.contains(&c) || Some(c) == tail)
            };

            let ahead = foe.head().neighbour(foe.heading);
            if ahead == you.head() {
                trace!("cut off foe {} at {}", foe.id, ahead);
                killed_foe = true;
            }

            let heading = if free(ahead) {
                Some(foe.heading)
            } else {
                Direction::iter()
                    .copied()
                    .filter(|d| free(foe.head().neighbour(*d)))
                    .map(|d| {
                        let area = flood_fill(
                            self.board,
                            foe.head().neighbour(d),
                            |c| !free(c),
                        );
                        (d, area)
                    })
                    .fold(None, |best: Option<(Direction, usize)>, next| {
                        match best {
                            Some(b) if b.1 >= next.1 => Some(b),
                            _ => Some(next),
                        }
                    })
                    .map(|(d, _)| d)
            };

            match heading {
                Some(heading) => {
                    let mut foe = foe.clone();
                    foe.advance(heading, foe_grows);
                    if food.remove(&foe.head()) {
                        foe.has_eaten = true;
                    }
                    foes.push(foe);
                },
                None => {
                    trace!("foe {} has no way out at {}", foe.id, foe.head());
                },
            }
        }

        let mut future = World::new(
            self.board,
            next_tick,
            you,
            foes,
            Arc::clone(&self.obstacles),
            food,
            self.growth_interval,
        );
        future.killed_foe = killed_foe;
        future
    }

    /// True when the head has something other than our own body beside it,
    /// or is pressed against the board edge parallel to its heading.
    pub fn is_head_wrapped(&self) -> bool {
        let head = self.you.head();
        let beside_blockade = self.you.heading.laterals().iter().any(|d| {
            let c = head.neighbour(*d);
            self.occupied.contains(&c) && !self.you.body_set.contains(&c)
        });

        beside_blockade
            || match self.you.heading {
                Direction::Up | Direction::Down => {
                    self.board.on_side_edge(head)
                },
                Direction::Left | Direction::Right => {
                    self.board.on_top_or_bottom_edge(head)
                },
            }
    }

    /// True when the heading points towards the centre of the board from
    /// the quadrant the head is in.
    pub fn is_moving_to_middle(&self) -> bool {
        let head = self.you.head();
        let horizontal = if head.x < self.board.width / 2 {
            Direction::Right
        } else {
            Direction::Left
        };
        let vertical = if head.y < self.board.height / 2 {
            Direction::Down
        } else {
            Direction::Up
        };
        self.you.heading == horizontal || self.you.heading == vertical
    }
}

fn vacating_tail(
    snake: &Snake,
    next_tick: u64,
    growth_interval: Option<u64>,
) -> Option<Coord> {
    (snake.body.len() > 1 && !snake.keeps_tail(next_tick, growth_interval))
        .then(|| snake.tail())
}

fn checked(board: Board, coords: Vec<Coord>) -> Result<Vec<Coord>> {
    match coords.iter().find(|c| !board.contains(**c)) {
        Some(c) => Err(eyre!("coordinate {c} is outside the board")),
        None => Ok(coords),
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.board.height {
            for x in 0..self.board.width {
                let c = Coord { x, y };
                if c == self.you.head() {
                    write!(f, "@")?;
                } else if self.occupied.contains(&c) {
                    write!(f, "#")?;
                } else if self.food.contains(&c) {
                    write!(f, "*")?;
                } else {
                    write!(f, ".")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
