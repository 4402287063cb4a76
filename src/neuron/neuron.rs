use rand::Rng;

use crate::math::sigmoid::sigmoid;

/// A single sigmoid unit.
///
/// Holds one weight per input plus a trailing bias weight. The bias *input*
/// is a constant supplied at construction and shared by every neuron in a
/// network; the bias *weight* (the last slot of `weights`) is trainable like
/// any other.
#[derive(Debug)]
pub struct Neuron {
    pub(crate) weights: Vec<f64>,
    bias: f64,
}

impl Neuron {
    /// Creates a neuron for `input_count` inputs, with `input_count + 1`
    /// weights drawn independently and uniformly from [-1, 1).
    pub fn new(input_count: usize, bias: f64) -> Neuron {
        let mut rng = rand::thread_rng();
        let weights = (0..input_count + 1)
            .map(|_| rng.gen::<f64>() * 2.0 - 1.0)
            .collect();

        Neuron { weights, bias }
    }

    /// Weighted sum of `input` with the bias input paired against the final
    /// weight, passed through the sigmoid. Pure with respect to the neuron's
    /// state.
    ///
    /// No length check is performed: an `input` that does not match the
    /// neuron's input count produces a numerically undefined result (the dot
    /// product truncates to the shorter of the two sequences).
    pub fn run(&self, input: &[f64]) -> f64 {
        let mut sum = 0.0;
        for (w, x) in self.weights.iter().zip(input) {
            sum += w * x;
        }
        sum += self.bias * self.weights[self.weights.len() - 1];

        sigmoid(sum)
    }

    /// Replaces the weight vector wholesale. The caller is responsible for
    /// supplying `input_count + 1` values; no validation is performed.
    pub fn set_weights(&mut self, weights: Vec<f64>) {
        self.weights = weights;
    }

    /// The current weights, bias weight last.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}
