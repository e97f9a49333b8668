pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use store::{
    Collection, DeleteResult, Document, DocumentStore, Filter, InsertOneResult, StoreError, UpdateResult,
    ID_FIELD,
};
