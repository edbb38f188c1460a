pub mod codec;

pub use codec::{load, read_params, save, write_params};
