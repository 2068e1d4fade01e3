pub mod error;
pub mod visit;

pub use error::AppError;
pub use visit::VisitType;
