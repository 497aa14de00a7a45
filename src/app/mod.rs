pub mod repository;

pub use repository::{SnippetRepository, StoreStatus};
