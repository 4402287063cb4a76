pub mod math;
pub mod neuron;
pub mod network;
pub mod error;
pub mod train;

// Convenience re-exports
pub use math::sigmoid::sigmoid;
pub use neuron::neuron::Neuron;
pub use network::network::Network;
pub use error::NetworkError;
pub use train::trainer::train_epoch;
pub use train::train_config::TrainConfig;
pub use train::epoch_stats::EpochStats;
pub use train::loop_fn::train_loop;
