use crate::network::network::Network;

/// Runs one full pass over the training pairs, a single-sample
/// backpropagation step per pair in the given order, and returns the mean
/// MSE across the pairs.
///
/// Sample order is the caller's order; there is no shuffling, so repeated
/// calls with fixed weights are fully deterministic.
///
/// # Panics
/// Panics if `inputs` is empty or the lengths mismatch.
pub fn train_epoch(network: &mut Network, inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> f64 {
    assert!(!inputs.is_empty(), "inputs must not be empty");
    assert_eq!(
        inputs.len(),
        targets.len(),
        "inputs and targets must have equal length"
    );

    let mut total_mse = 0.0;
    for (input, target) in inputs.iter().zip(targets.iter()) {
        total_mse += network.train_one(input, target);
    }

    total_mse / inputs.len() as f64
}
