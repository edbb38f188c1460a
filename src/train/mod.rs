pub mod gradients;
pub mod epoch_stats;
pub mod train_config;
pub mod loop_fn;

pub use gradients::{accumulate_batch, Gradients};
pub use epoch_stats::EpochStats;
pub use train_config::TrainConfig;
pub use loop_fn::{run_epoch, train_loop};
