pub mod memory;
pub mod repository;
pub mod store;
pub mod supabase;
pub mod unit_of_work;

pub use memory::MemoryStore;
pub use store::{Filter, Mutation, SharedStore, Store, StoreError};
pub use supabase::SupabaseStore;
pub use unit_of_work::UnitOfWork;
