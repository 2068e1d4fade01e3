pub mod blocking;
pub mod test_utils;

pub use blocking::run_blocking;
