pub mod cascade;
pub mod lesson_ops;
pub mod person_ops;
pub mod store;

pub use store::Store;
