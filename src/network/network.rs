use std::fmt;

use crate::error::NetworkError;
use crate::neuron::neuron::Neuron;

/// A fully-connected feed-forward network of sigmoid neurons.
///
/// `layer_sizes[0]` is the input width and owns no neurons; every following
/// entry describes a layer of [`Neuron`]s, each wired to the entire previous
/// layer. `activations` and `error_terms` mirror `layer_sizes` and are
/// scratch state overwritten on every [`run`](Network::run) /
/// [`train_one`](Network::train_one) call; the neurons' weights persist and
/// accumulate updates across training calls.
pub struct Network {
    layer_sizes: Vec<usize>,
    /// Layers 1..N; network layer `i` lives at `layers[i - 1]`.
    layers: Vec<Vec<Neuron>>,
    /// Full shape: `activations[0]` holds the current input sample.
    activations: Vec<Vec<f64>>,
    /// Same shape as `activations`; valid for layers >= 1, only immediately
    /// after a `train_one` call.
    error_terms: Vec<Vec<f64>>,
    bias: f64,
    eta: f64,
}

impl Network {
    /// Builds a network from per-layer widths, a shared bias input value and
    /// a learning rate. Weights are initialized uniformly in [-1, 1).
    ///
    /// # Errors
    /// Returns `NetworkError::InvalidTopology` when fewer than two layers are
    /// given or any layer has width zero; such a configuration cannot produce
    /// an output layer.
    pub fn new(layer_sizes: Vec<usize>, bias: f64, eta: f64) -> Result<Network, NetworkError> {
        if layer_sizes.len() < 2 {
            return Err(NetworkError::InvalidTopology(
                "a network needs an input layer and at least one neuron layer",
            ));
        }
        if layer_sizes.contains(&0) {
            return Err(NetworkError::InvalidTopology("layer width must be positive"));
        }

        let layers = layer_sizes
            .windows(2)
            .map(|pair| (0..pair[1]).map(|_| Neuron::new(pair[0], bias)).collect())
            .collect();
        let activations: Vec<Vec<f64>> = layer_sizes.iter().map(|&n| vec![0.0; n]).collect();
        let error_terms = activations.clone();

        Ok(Network {
            layer_sizes,
            layers,
            activations,
            error_terms,
            bias,
            eta,
        })
    }

    /// Per-layer widths, input layer first.
    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    /// Neuron layers, in forward order (the input layer owns no neurons and
    /// is not represented here).
    pub fn layers(&self) -> &[Vec<Neuron>] {
        &self.layers
    }

    /// Loads a full weight tensor, indexed `[layer - 1][neuron][weight]`.
    ///
    /// No shape validation is performed; a tensor with more layers or
    /// neurons than the network panics on indexing, and
    /// wrong per-neuron lengths produce numerically undefined results on the
    /// next `run`. Use [`try_set_weights`](Network::try_set_weights) for the
    /// checked variant.
    pub fn set_weights(&mut self, weights: Vec<Vec<Vec<f64>>>) {
        for (i, layer_weights) in weights.into_iter().enumerate() {
            for (j, neuron_weights) in layer_weights.into_iter().enumerate() {
                self.layers[i][j].set_weights(neuron_weights);
            }
        }
    }

    /// Validating variant of [`set_weights`](Network::set_weights): rejects a
    /// tensor whose layer count, per-layer neuron count or per-neuron weight
    /// count does not match this network.
    pub fn try_set_weights(&mut self, weights: Vec<Vec<Vec<f64>>>) -> Result<(), NetworkError> {
        if weights.len() != self.layers.len() {
            return Err(NetworkError::DimensionMismatch {
                what: "layers",
                got: weights.len(),
                expected: self.layers.len(),
            });
        }
        for (i, layer_weights) in weights.iter().enumerate() {
            if layer_weights.len() != self.layer_sizes[i + 1] {
                return Err(NetworkError::DimensionMismatch {
                    what: "neurons",
                    got: layer_weights.len(),
                    expected: self.layer_sizes[i + 1],
                });
            }
            for neuron_weights in layer_weights {
                if neuron_weights.len() != self.layer_sizes[i] + 1 {
                    return Err(NetworkError::DimensionMismatch {
                        what: "weights",
                        got: neuron_weights.len(),
                        expected: self.layer_sizes[i] + 1,
                    });
                }
            }
        }

        self.set_weights(weights);
        Ok(())
    }

    /// Forward pass: feeds `x` through every layer in order and returns an
    /// owned copy of the output layer's activations.
    ///
    /// Deterministic given the current weights; the only side effect is
    /// overwriting the stored activations.
    pub fn run(&mut self, x: &[f64]) -> Vec<f64> {
        self.activations[0] = x.to_vec();

        for i in 1..self.layer_sizes.len() {
            let outputs: Vec<f64> = self.layers[i - 1]
                .iter()
                .map(|neuron| neuron.run(&self.activations[i - 1]))
                .collect();
            self.activations[i] = outputs;
        }

        self.activations[self.layer_sizes.len() - 1].clone()
    }

    /// One single-sample stochastic gradient descent step on the pair
    /// `(x, y)`. Returns the sample's mean squared error.
    ///
    /// The returned MSE is a monitoring value: the delta rule below uses the
    /// raw `y - output` error, not the derivative of the squared term.
    pub fn train_one(&mut self, x: &[f64], y: &[f64]) -> f64 {
        let outputs = self.run(x);
        let last = self.layer_sizes.len() - 1;

        let error: Vec<f64> = y.iter().zip(&outputs).map(|(t, o)| t - o).collect();
        let mse = error.iter().map(|e| e * e).sum::<f64>() / self.layer_sizes[last] as f64;

        // Output-layer error terms: sigmoid derivative times raw error.
        for j in 0..self.layer_sizes[last] {
            self.error_terms[last][j] = outputs[j] * (1.0 - outputs[j]) * error[j];
        }

        // Hidden-layer error terms, strictly backward: each layer depends
        // only on the already-computed terms of the layer after it. Zero
        // iterations for a single-layer (perceptron) network.
        for i in (1..last).rev() {
            for j in 0..self.layer_sizes[i] {
                let mut forward_error = 0.0;
                for (k, next_neuron) in self.layers[i].iter().enumerate() {
                    forward_error += next_neuron.weights[j] * self.error_terms[i + 1][k];
                }
                self.error_terms[i][j] =
                    self.activations[i][j] * (1.0 - self.activations[i][j]) * forward_error;
            }
        }

        // Weight updates, forward. Every delta is derived from the error
        // terms and activations computed above, so in-place application never
        // feeds an updated weight back into this call.
        for i in 1..=last {
            for j in 0..self.layer_sizes[i] {
                let error_term = self.error_terms[i][j];
                for k in 0..=self.layer_sizes[i - 1] {
                    let delta = if k == self.layer_sizes[i - 1] {
                        // Bias-weight slot: the input is the constant bias.
                        self.eta * error_term * self.bias
                    } else {
                        self.eta * error_term * self.activations[i - 1][k]
                    };
                    self.layers[i - 1][j].weights[k] += delta;
                }
            }
        }

        mse
    }
}

impl fmt::Display for Network {
    /// Free-form diagnostic dump of every weight, by layer and neuron index.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, layer) in self.layers.iter().enumerate() {
            for (j, neuron) in layer.iter().enumerate() {
                writeln!(f, "layer {} neuron {}: {:?}", i + 1, j, neuron.weights())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hand-built weights that compute XOR: neuron 0 is a NAND gate,
    /// neuron 1 an OR gate, the output neuron an AND of the two.
    fn xor_weights() -> Vec<Vec<Vec<f64>>> {
        vec![
            vec![vec![-10.0, -10.0, 15.0], vec![15.0, 15.0, -10.0]],
            vec![vec![10.0, 10.0, -15.0]],
        ]
    }

    fn network_2_2_1() -> Network {
        Network::new(vec![2, 2, 1], 1.0, 0.5).unwrap()
    }

    #[test]
    fn construction_respects_layer_sizes() {
        let network = Network::new(vec![2, 3, 1], 1.0, 0.5).unwrap();
        assert_eq!(network.layer_sizes(), &[2, 3, 1]);
        assert_eq!(network.layers().len(), 2);
        assert_eq!(network.layers()[0].len(), 3);
        assert_eq!(network.layers()[1].len(), 1);
        for neuron in &network.layers()[0] {
            assert_eq!(neuron.weights().len(), 3);
        }
        assert_eq!(network.layers()[1][0].weights().len(), 4);
    }

    #[test]
    fn rejects_degenerate_topologies() {
        assert!(matches!(
            Network::new(vec![], 1.0, 0.5),
            Err(NetworkError::InvalidTopology(_))
        ));
        assert!(matches!(
            Network::new(vec![2], 1.0, 0.5),
            Err(NetworkError::InvalidTopology(_))
        ));
        assert!(matches!(
            Network::new(vec![2, 0, 1], 1.0, 0.5),
            Err(NetworkError::InvalidTopology(_))
        ));
    }

    #[test]
    fn forward_matches_hand_computed_outputs() {
        let mut network = network_2_2_1();
        network.set_weights(xor_weights());

        let cases = [
            ([0.0, 0.0], 0.006695849330690521),
            ([0.0, 1.0], 0.9923558641717396),
            ([1.0, 0.0], 0.9923558641717396),
            ([1.0, 1.0], 0.0071528097665848715),
        ];
        for (input, expected) in cases {
            let out = network.run(&input);
            assert_eq!(out.len(), 1);
            assert!(
                (out[0] - expected).abs() < 1e-9,
                "run({input:?}) = {}, expected {expected}",
                out[0]
            );
        }
    }

    #[test]
    fn run_is_deterministic_and_returns_an_owned_copy() {
        let mut network = network_2_2_1();
        network.set_weights(xor_weights());

        let mut first = network.run(&[1.0, 0.0]);
        first[0] = -7.0; // must not alias internal state
        let second = network.run(&[1.0, 0.0]);
        assert_eq!(second[0], 0.9923558641717396);
        assert_eq!(network.run(&[1.0, 0.0]), second);
    }

    #[test]
    fn try_set_weights_validates_every_level() {
        let mut network = network_2_2_1();

        let too_few_layers = vec![vec![vec![0.0; 3]; 2]];
        assert!(matches!(
            network.try_set_weights(too_few_layers),
            Err(NetworkError::DimensionMismatch { what: "layers", .. })
        ));

        let wrong_neuron_count = vec![vec![vec![0.0; 3]; 3], vec![vec![0.0; 3]]];
        assert!(matches!(
            network.try_set_weights(wrong_neuron_count),
            Err(NetworkError::DimensionMismatch { what: "neurons", .. })
        ));

        let wrong_weight_count = vec![vec![vec![0.0; 3]; 2], vec![vec![0.0; 4]]];
        assert!(matches!(
            network.try_set_weights(wrong_weight_count),
            Err(NetworkError::DimensionMismatch { what: "weights", .. })
        ));

        assert!(network.try_set_weights(xor_weights()).is_ok());
        assert_eq!(network.layers()[1][0].weights(), &[10.0, 10.0, -15.0]);
    }

    #[test]
    fn train_one_matches_hand_derived_step() {
        let mut network = network_2_2_1();
        network.set_weights(vec![
            vec![vec![0.1, 0.2, 0.3], vec![-0.4, 0.5, -0.6]],
            vec![vec![0.7, -0.8, 0.9]],
        ]);

        let mse = network.train_one(&[1.0, 0.0], &[1.0]);
        assert!((mse - 0.062003284433164975).abs() < 1e-9);

        let expected = [
            // Hidden layer: second slot untouched (its input is 0), bias slot
            // moves by the same delta as the first (its input is 1).
            vec![0.10391564079819436, 0.2, 0.30391564079819433],
            vec![-0.40366202955203595, 0.5, -0.6036620295520359],
            // Output layer: inputs are the hidden activations and the bias.
            vec![0.7139387006400464, -0.7937384813285098, 0.9232820910947592],
        ];
        let got: Vec<&[f64]> = network
            .layers()
            .iter()
            .flatten()
            .map(|n| n.weights())
            .collect();
        for (neuron_got, neuron_expected) in got.iter().zip(&expected) {
            for (g, e) in neuron_got.iter().zip(neuron_expected) {
                assert!((g - e).abs() < 1e-9, "weight {g} != expected {e}");
            }
        }
    }

    #[test]
    fn train_one_supports_a_single_layer_perceptron() {
        let mut network = Network::new(vec![2, 1], 1.0, 0.5).unwrap();
        network.set_weights(vec![vec![vec![0.25, -0.5, 0.75]]]);

        let mse = network.train_one(&[1.0, 1.0], &[0.0]);
        assert!((mse - 0.3874556190002601).abs() < 1e-9);

        let expected = [0.1768598732365212, -0.5731401267634788, 0.6768598732365212];
        for (g, e) in network.layers()[0][0].weights().iter().zip(&expected) {
            assert!((g - e).abs() < 1e-9);
        }
    }

    #[test]
    fn mse_is_non_negative_and_zero_only_on_exact_match() {
        let mut network = network_2_2_1();
        for input in [[0.0, 0.0], [0.3, 0.8], [1.0, 1.0]] {
            let mse = network.train_one(&input, &[0.5]);
            assert!(mse >= 0.0);
        }

        // A target equal to the current output gives a zero error vector,
        // an exactly-zero MSE and no weight movement.
        let mut network = network_2_2_1();
        network.set_weights(xor_weights());
        let target = network.run(&[1.0, 0.0]);
        let before: Vec<Vec<f64>> = network.layers()[0]
            .iter()
            .chain(&network.layers()[1])
            .map(|n| n.weights().to_vec())
            .collect();
        let mse = network.train_one(&[1.0, 0.0], &target);
        assert_eq!(mse, 0.0);
        let after: Vec<Vec<f64>> = network.layers()[0]
            .iter()
            .chain(&network.layers()[1])
            .map(|n| n.weights().to_vec())
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn weight_lengths_hold_after_training() {
        let mut network = Network::new(vec![2, 4, 3, 1], 1.0, 0.5).unwrap();
        for _ in 0..200 {
            network.train_one(&[0.0, 1.0], &[1.0]);
            network.train_one(&[1.0, 1.0], &[0.0]);
        }
        for (i, layer) in network.layers().iter().enumerate() {
            assert_eq!(layer.len(), network.layer_sizes()[i + 1]);
            for neuron in layer {
                assert_eq!(neuron.weights().len(), network.layer_sizes()[i] + 1);
            }
        }
    }

    #[test]
    fn display_lists_every_neuron() {
        let mut network = network_2_2_1();
        network.set_weights(xor_weights());
        let report = network.to_string();
        assert!(report.contains("layer 1 neuron 0"));
        assert!(report.contains("layer 1 neuron 1"));
        assert!(report.contains("layer 2 neuron 0"));
        assert!(report.contains("10.0"));
    }
}
