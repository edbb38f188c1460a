pub mod dims;
pub mod params;
pub mod forward;
pub mod network;

pub use dims::NetworkDims;
pub use params::ParameterStore;
pub use forward::{forward, Activations};
pub use network::Network;
