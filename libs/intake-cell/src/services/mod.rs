pub mod greeting;
pub mod sessions;
pub mod wizard;

pub use greeting::greeting;
pub use sessions::{SessionGuard, SessionStore};
pub use wizard::WizardService;
