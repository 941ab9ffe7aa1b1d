use serde::Serialize;
use std::fmt;

use crate::activation::activation::ActivationFunction;

#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub name: String,
    pub activation: ActivationFunction,
    pub output_units: usize,
    pub params: usize,
}

/// Per-layer overview of a network: name, output shape and parameter count.
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub rows: Vec<SummaryRow>,
    pub total_params: usize,
}

const RULE_WIDTH: usize = 65;

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "_".repeat(RULE_WIDTH))?;
        writeln!(f, "{:<29}{:<26}{}", "Layer (type)", "Output shape", "Param #")?;
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;
        for (i, row) in self.rows.iter().enumerate() {
            let name = format!("{} (Dense, {})", row.name, row.activation.name());
            let shape = format!("[null,{}]", row.output_units);
            writeln!(f, "{:<29}{:<26}{}", name, shape, row.params)?;
            let rule = if i + 1 == self.rows.len() { "=" } else { "_" };
            writeln!(f, "{}", rule.repeat(RULE_WIDTH))?;
        }
        writeln!(f, "Total params: {}", self.total_params)?;
        writeln!(f, "Trainable params: {}", self.total_params)?;
        write!(f, "Non-trainable params: 0")
    }
}
