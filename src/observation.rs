//! Encodings from world state to the integer index of the value table.
//!
//! Every encoding is mixed-radix over small bounded digits, so the result
//! always falls in `0..size(layout)`.

use serde::{Deserialize, Serialize};

use crate::world::{Layout, Movement, Pos, Tile, World};

pub type Observation = usize;

/// Codes seen by [`ObservationEncoding::Neighborhood`] for one neighbouring cell.
const NEIGHBOR_CODES: usize = 5;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationEncoding {
    /// Agent row and column followed by goal row and column.
    Coordinates,
    /// Flattened agent position combined with the number of pickups collected.
    #[default]
    PositionWithPickups,
    /// What lies in each of the four neighbouring cells, walls included.
    Neighborhood,
}

impl ObservationEncoding {
    pub fn size(self, layout: &Layout) -> usize {
        match self {
            ObservationEncoding::Coordinates => layout.cell_count() * layout.cell_count(),
            ObservationEncoding::PositionWithPickups => {
                layout.cell_count() * (layout.total_pickups() + 1)
            }
            ObservationEncoding::Neighborhood => NEIGHBOR_CODES.pow(Movement::ALL.len() as u32),
        }
    }

    pub fn encode(self, world: &World) -> Observation {
        let layout = world.layout();
        match self {
            ObservationEncoding::Coordinates => {
                flat_index(layout, world.agent()) * layout.cell_count()
                    + flat_index(layout, world.goal())
            }
            ObservationEncoding::PositionWithPickups => {
                flat_index(layout, world.agent()) * (layout.total_pickups() + 1)
                    + world.pickups_collected()
            }
            ObservationEncoding::Neighborhood => Movement::ALL
                .iter()
                .fold(0, |acc, movement| {
                    acc * NEIGHBOR_CODES + neighbor_code(world, *movement)
                }),
        }
    }
}

fn flat_index(layout: &Layout, pos: Pos) -> usize {
    pos.row * layout.cols + pos.col
}

fn neighbor_code(world: &World, movement: Movement) -> usize {
    let agent = world.agent();
    let (d_row, d_col) = movement.into_vector();
    let row = agent.row as isize + d_row;
    let col = agent.col as isize + d_col;
    if row < 0 || col < 0 {
        return 1;
    }
    let pos = Pos::new(row as usize, col as usize);
    if !world.layout().contains(pos) {
        return 1;
    }
    match world.tile_at(pos) {
        // the agent never neighbours itself
        Tile::Floor | Tile::Survivor => 0,
        Tile::Hazard => 2,
        Tile::Pickup => 3,
        Tile::Goal => 4,
    }
}
