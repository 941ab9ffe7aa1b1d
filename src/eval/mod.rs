use log::info;
use serde::{Deserialize, Serialize};

use crate::data::normalize::{normalize, MinMax};
use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::network::network::Network;

/// Model output for one query input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub input: f64,
    pub value: f64,
}

/// Scales `queries` with the training `bounds`, runs inference and returns
/// one prediction per query, in query order.
pub fn predict(network: &Network, bounds: MinMax, queries: &[f64]) -> Result<Vec<Prediction>> {
    if queries.is_empty() {
        return Ok(Vec::new());
    }
    let normalized = normalize(&Matrix::column(queries), Some(bounds))?;
    let output = network.predict(&normalized.tensor)?;
    info!("evaluated {} queries", queries.len());

    Ok(queries
        .iter()
        .enumerate()
        .map(|(i, &input)| Prediction { input, value: output.get(i, 0) })
        .collect())
}
