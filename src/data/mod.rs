pub mod sample;
pub mod csv;
pub mod ascii;

pub use sample::Sample;
pub use csv::load_csv;
pub use ascii::to_ascii;
