use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{Error, Result};
use crate::layers::dense::Layer;
use crate::network::network::Network;

/// One dense layer in a network specification.
///
/// The input width is implied: it is the previous layer's `units`, or
/// `NetworkSpec::input_size` for the first layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub units: usize,
    #[serde(default)]
    pub activation: ActivationFunction,
}

impl LayerSpec {
    pub fn new(units: usize, activation: ActivationFunction) -> LayerSpec {
        LayerSpec { units, activation }
    }
}

/// A serializable description of a sequential dense network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSpec {
    pub name: String,
    pub input_size: usize,
    /// Ordered list of layers (input → output).
    pub layers: Vec<LayerSpec>,
}

impl Default for NetworkSpec {
    /// `1 → 50 relu → 10 relu → 1 linear`.
    fn default() -> Self {
        NetworkSpec {
            name: "square".to_owned(),
            input_size: 1,
            layers: vec![
                LayerSpec::new(50, ActivationFunction::ReLU),
                LayerSpec::new(10, ActivationFunction::ReLU),
                LayerSpec::new(1, ActivationFunction::Identity),
            ],
        }
    }
}

impl NetworkSpec {
    pub fn output_size(&self) -> usize {
        self.layers.last().map(|l| l.units).unwrap_or(0)
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_size == 0 {
            return Err(Error::InvalidConfig("network input_size must be at least 1".into()));
        }
        if self.layers.is_empty() {
            return Err(Error::InvalidConfig("network needs at least one layer".into()));
        }
        if let Some(i) = self.layers.iter().position(|l| l.units == 0) {
            return Err(Error::InvalidConfig(format!("layer {} has zero units", i + 1)));
        }
        Ok(())
    }

    /// Instantiates freshly initialized layers.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Network> {
        self.validate()?;
        let mut input_size = self.input_size;
        let layers = self
            .layers
            .iter()
            .map(|spec| {
                let layer = Layer::new(spec.units, input_size, spec.activation, rng);
                input_size = spec.units;
                layer
            })
            .collect();
        Ok(Network::new(layers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn default_architecture_has_621_params() {
        let net = NetworkSpec::default().build(&mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(net.layers.len(), 3);
        assert_eq!(net.param_count(), 100 + 510 + 11);
        assert_eq!(net.input_size(), 1);
        assert_eq!(net.output_size(), 1);
    }

    #[test]
    fn summary_lists_layers_and_total() {
        let net = NetworkSpec::default().build(&mut StdRng::seed_from_u64(1)).unwrap();
        let summary = net.summary();
        assert_eq!(summary.rows.iter().map(|r| r.params).collect::<Vec<_>>(), vec![100, 510, 11]);
        let text = summary.to_string();
        assert!(text.contains("dense_1 (Dense, relu)"));
        assert!(text.contains("[null,50]"));
        assert!(text.contains("Total params: 621"));
    }

    #[test]
    fn zero_width_layer_is_rejected() {
        let mut spec = NetworkSpec::default();
        spec.layers[1].units = 0;
        assert!(matches!(spec.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let spec: NetworkSpec = serde_json::from_str(r#"{ "layers": [ { "units": 1 } ] }"#).unwrap();
        assert_eq!(spec.input_size, 1);
        assert_eq!(spec.layers[0].activation, ActivationFunction::Identity);
    }
}
