pub mod crud;
pub mod interface;
pub mod memory;
pub mod model;
pub mod writer;

pub use crud::MySqlAccountStore;
pub use interface::{AccountStore, StoreError};
pub use memory::InMemoryAccountStore;
pub use writer::{AccountKey, AccountWriter};
