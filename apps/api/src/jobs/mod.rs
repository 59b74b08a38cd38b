pub mod extract;
pub mod handlers;
pub mod pipeline;
pub mod store;

pub use store::InMemoryJobStore;
