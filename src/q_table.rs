use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use ndarray::{Array2, ArrayView1};
use ordered_float::OrderedFloat;

use crate::error::{Error, Result};
use crate::observation::Observation;
use crate::world::Movement;

/// Dense action-value estimates, one row per observation and one column per movement.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    values: Array2<f32>,
}

impl QTable {
    pub fn new(observations: usize, actions: usize) -> Self {
        Self {
            values: Array2::<f32>::zeros((observations, actions)),
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn get(&self, state: Observation, action: Movement) -> f32 {
        self.values[[state, action.index()]]
    }

    pub fn set(&mut self, state: Observation, action: Movement, value: f32) {
        self.values[[state, action.index()]] = value;
    }

    pub fn row(&self, state: Observation) -> ArrayView1<'_, f32> {
        self.values.row(state)
    }

    pub fn max_value(&self, state: Observation) -> f32 {
        self.row(state)
            .iter()
            .copied()
            .map(OrderedFloat)
            .max()
            .map_or(0.0, OrderedFloat::into_inner)
    }

    /// Highest-valued movement; ties go to the lowest action index.
    pub fn best_action(&self, state: Observation) -> Movement {
        Movement::ALL.into_iter().fold(Movement::ALL[0], |a, f| -> Movement {
            if self.get(state, f) > self.get(state, a) { f }
            else { a }
        })
    }

    /// One Q-learning step toward `reward + discount * max Q(next_state)`.
    /// A `None` next state drops the bootstrap term. Returns the temporal difference.
    pub fn update(
        &mut self,
        state: Observation,
        action: Movement,
        reward: f32,
        next_state: Option<Observation>,
        step_size: f32,
        discount: f32,
    ) -> f32 {
        let q_value = self.get(state, action);
        let best_next_q = next_state.map_or(0.0, |s_p| self.max_value(s_p));
        // Temporal difference
        let t_d = reward + discount * best_next_q - q_value;
        self.set(state, action, q_value + step_size * t_d);
        t_d
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(writer, &self.values).map_err(Error::Encode)?;
        Ok(())
    }

    /// Reads a stored table and rejects it unless its shape is exactly `expected`.
    pub fn load(path: impl AsRef<Path>, expected: (usize, usize)) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let values: Array2<f32> = bincode::deserialize_from(reader).map_err(Error::Decode)?;
        Self::from_values(values, expected)
    }

    pub fn from_values(values: Array2<f32>, expected: (usize, usize)) -> Result<Self> {
        let found = values.dim();
        if found != expected {
            return Err(Error::ShapeMismatch { expected, found });
        }
        Ok(Self { values })
    }

    pub fn values(&self) -> &Array2<f32> {
        &self.values
    }
}
