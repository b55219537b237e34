use std::fmt;

use rand::{
    distributions::{Distribution, Standard},
    Rng, SeedableRng,
};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

// Action
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Movement {
    Left,
    Down,
    Right,
    Up,
}

impl Movement {
    /// All movements, ordered by their action index.
    pub const ALL: [Movement; 4] = [Movement::Left, Movement::Down, Movement::Right, Movement::Up];

    pub fn into_vector(self) -> (isize, isize)
    {
        match self {
            Movement::Up    => (-1, 0),
            Movement::Down  => ( 1, 0),
            Movement::Left  => ( 0,-1),
            Movement::Right => ( 0, 1),
        }
    }

    pub fn index(self) -> usize {
        match self {
            Movement::Left => 0,
            Movement::Down => 1,
            Movement::Right => 2,
            Movement::Up => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Movement> {
        Movement::ALL.get(index).copied()
    }
}

impl Distribution<Movement> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Movement {
        Movement::ALL[rng.gen_range(0..Movement::ALL.len())]
    }
}

/// What is drawn on a single cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Tile {
    Floor,
    Survivor,
    Hazard,
    Pickup,
    Goal,
}

impl Tile {
    pub fn code(self) -> u8 {
        match self {
            Tile::Floor => 0,
            Tile::Survivor => 1,
            Tile::Hazard => 2,
            Tile::Pickup => 3,
            Tile::Goal => 4,
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Tile::Floor => '.',
            Tile::Survivor => 'S',
            Tile::Hazard => 'Z',
            Tile::Pickup => 'A',
            Tile::Goal => 'D',
        };
        write!(f, "{}", letter)
    }
}

/// Outcome of a single step, reported in priority order goal > hazard > pickup > floor.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    Floor,
    Hazard,
    Pickup,
    Goal,
}

impl Event {
    /// Scalar code of the tile the agent landed on.
    pub fn code(self) -> u8 {
        let tile = match self {
            Event::Floor => Tile::Floor,
            Event::Hazard => Tile::Hazard,
            Event::Pickup => Tile::Pickup,
            Event::Goal => Tile::Goal,
        };
        tile.code()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Placement {
    Fixed { hazards: Vec<Pos>, pickups: Vec<Pos> },
    /// Counts drawn from the world RNG on every reset, away from row 0 and column 0.
    Random { hazards: usize, pickups: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub rows: usize,
    pub cols: usize,
    pub start: Pos,
    pub goal: Pos,
    pub placement: Placement,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            rows: 4,
            cols: 5,
            start: Pos::new(0, 0),
            goal: Pos::new(0, 4),
            placement: Placement::Fixed {
                hazards: vec![Pos::new(0, 1), Pos::new(1, 1)],
                pickups: vec![Pos::new(3, 0)],
            },
        }
    }
}

impl Layout {
    pub fn contains(&self, pos: Pos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn total_pickups(&self) -> usize {
        match &self.placement {
            Placement::Fixed { pickups, .. } => pickups.len(),
            Placement::Random { pickups, .. } => *pickups,
        }
    }

    pub fn iter_all_coordinates(&self) -> PosIter {
        PosIter::new(self.rows, self.cols)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(Error::InvalidConfig(format!(
                "grid must be non-empty, got {}x{}",
                self.rows, self.cols
            )));
        }
        for (name, pos) in [("start", self.start), ("goal", self.goal)] {
            if !self.contains(pos) {
                return Err(Error::InvalidConfig(format!(
                    "{} {} outside {}x{} grid",
                    name, pos, self.rows, self.cols
                )));
            }
        }
        if self.start == self.goal {
            return Err(Error::InvalidConfig(format!("start and goal both at {}", self.goal)));
        }

        match &self.placement {
            Placement::Fixed { hazards, pickups } => {
                let mut seen: Vec<Pos> = vec![self.start, self.goal];
                for pos in hazards.iter().chain(pickups.iter()) {
                    if !self.contains(*pos) {
                        return Err(Error::InvalidConfig(format!(
                            "object at {} outside {}x{} grid",
                            pos, self.rows, self.cols
                        )));
                    }
                    if seen.contains(pos) {
                        return Err(Error::InvalidConfig(format!("cell {} used twice", pos)));
                    }
                    seen.push(*pos);
                }
            }
            Placement::Random { hazards, pickups } => {
                let free = self
                    .iter_all_coordinates()
                    .filter(|pos| pos.row > 0 && pos.col > 0)
                    .filter(|pos| *pos != self.start && *pos != self.goal)
                    .count();
                if hazards + pickups > free {
                    return Err(Error::InvalidConfig(format!(
                        "{} hazards and {} pickups do not fit in {} free cells",
                        hazards, pickups, free
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Row-major iterator over every cell of a grid.
pub struct PosIter {
    next: usize,
    rows: usize,
    cols: usize,
}

impl PosIter {
    fn new(rows: usize, cols: usize) -> PosIter {
        PosIter { next: 0, rows, cols }
    }
}

impl Iterator for PosIter {
    type Item = Pos;

    fn next(&mut self) -> Option<Pos> {
        if self.cols == 0 || self.next >= self.rows * self.cols {
            return None;
        }
        let pos = Pos::new(self.next / self.cols, self.next % self.cols);
        self.next += 1;
        Some(pos)
    }
}

pub struct World {
    layout: Layout,
    agent: Pos,
    hazards: Vec<Pos>,
    pickups: Vec<Pos>,
    pickups_collected: usize,
    rng: ChaCha8Rng,
}

impl World {
    pub fn new(layout: Layout) -> Result<Self>
    {
        layout.validate()?;
        let mut world = Self {
            agent: layout.start,
            layout,
            hazards: Vec::new(),
            pickups: Vec::new(),
            pickups_collected: 0,
            rng: ChaCha8Rng::seed_from_u64(0),
        };
        world.reset(None);
        Ok(world)
    }

    /// Puts the agent back on the start cell and restores hazards and pickups.
    /// `None` keeps drawing from the current RNG stream.
    pub fn reset(&mut self, seed: Option<u64>) {
        if let Some(seed) = seed {
            self.rng = ChaCha8Rng::seed_from_u64(seed);
        }
        self.agent = self.layout.start;
        self.pickups_collected = 0;

        match self.layout.placement.clone() {
            Placement::Fixed { hazards, pickups } => {
                self.hazards = hazards;
                self.pickups = pickups;
            }
            Placement::Random { hazards, pickups } => {
                self.hazards.clear();
                self.pickups.clear();
                for _ in 0..hazards {
                    let pos = self.random_free_pos();
                    self.hazards.push(pos);
                }
                for _ in 0..pickups {
                    let pos = self.random_free_pos();
                    self.pickups.push(pos);
                }
            }
        }
    }

    // Layout::validate guarantees enough free cells for this to terminate.
    fn random_free_pos(&mut self) -> Pos {
        loop {
            let pos = Pos::new(
                self.rng.gen_range(1..self.layout.rows),
                self.rng.gen_range(1..self.layout.cols),
            );
            if pos != self.layout.goal
                && pos != self.layout.start
                && !self.hazards.contains(&pos)
                && !self.pickups.contains(&pos)
            {
                return pos;
            }
        }
    }

    fn check_movement(&self, pos: Pos, movement: Movement) -> Pos
    {
        let (d_row, d_col) = movement.into_vector();
        let row = (pos.row as isize + d_row).clamp(0, self.layout.rows as isize - 1);
        let col = (pos.col as isize + d_col).clamp(0, self.layout.cols as isize - 1);
        Pos::new(row as usize, col as usize)
    }

    pub fn step(&mut self, movement: Movement) -> Event {
        self.agent = self.check_movement(self.agent, movement);

        if self.agent == self.layout.goal {
            Event::Goal
        } else if let Some(i) = self.hazards.iter().position(|p| *p == self.agent) {
            self.hazards.swap_remove(i);
            Event::Hazard
        } else if let Some(i) = self.pickups.iter().position(|p| *p == self.agent) {
            self.pickups.swap_remove(i);
            self.pickups_collected += 1;
            Event::Pickup
        } else {
            Event::Floor
        }
    }

    pub fn tile_at(&self, pos: Pos) -> Tile {
        if pos == self.agent {
            Tile::Survivor
        } else if pos == self.layout.goal {
            Tile::Goal
        } else if self.hazards.contains(&pos) {
            Tile::Hazard
        } else if self.pickups.contains(&pos) {
            Tile::Pickup
        } else {
            Tile::Floor
        }
    }

    pub fn layout(&self) -> &Layout { &self.layout }

    pub fn agent(&self) -> Pos { self.agent }

    pub fn goal(&self) -> Pos { self.layout.goal }

    pub fn hazards(&self) -> &[Pos] { &self.hazards }

    pub fn pickups(&self) -> &[Pos] { &self.pickups }

    pub fn pickups_collected(&self) -> usize { self.pickups_collected }

    pub fn total_pickups(&self) -> usize { self.layout.total_pickups() }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.layout.rows {
            for col in 0..self.layout.cols {
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", self.tile_at(Pos::new(row, col)))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
