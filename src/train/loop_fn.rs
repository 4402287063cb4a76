use std::sync::atomic::Ordering;
use std::time::Instant;

use log::info;

use crate::network::network::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;
use crate::train::trainer::train_epoch;

/// Trains `network` for `config.epochs` epochs and returns the mean MSE of
/// the **last completed epoch**.
///
/// # Arguments
/// - `network` - mutable reference to the network; modified in place
/// - `inputs`  - training samples, each a `Vec<f64>` of input-layer width
/// - `targets` - corresponding targets, same length as `inputs`
/// - `config`  - epoch count, report interval, optional progress channel,
///   optional stop flag
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
pub fn train_loop(
    network: &mut Network,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    config: &TrainConfig,
) -> f64 {
    let mut last_avg_mse = 0.0;

    for epoch in 1..=config.epochs {
        if let Some(ref flag) = config.stop_flag {
            if flag.load(Ordering::Relaxed) {
                info!("stop flag set, ending training before epoch {epoch}");
                break;
            }
        }

        let t_start = Instant::now();
        let avg_mse = train_epoch(network, inputs, targets);
        last_avg_mse = avg_mse;
        let elapsed_ms = t_start.elapsed().as_millis() as u64;

        if config.report_every > 0 && epoch % config.report_every == 0 {
            info!("epoch {epoch}/{}: avg mse {avg_mse:.6}", config.epochs);
        }

        if let Some(ref tx) = config.progress_tx {
            let stats = EpochStats {
                epoch,
                total_epochs: config.epochs,
                avg_mse,
                elapsed_ms,
            };
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                break;
            }
        }
    }

    last_avg_mse
}
