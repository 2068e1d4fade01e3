pub mod codec;
pub mod error;
pub mod store;
pub mod table;

pub use error::StoreError;
pub use store::FlatFileStore;
pub use table::{RecordView, TableKind, TableRow};
