pub mod clock;
pub mod db;
pub mod memory;

pub use clock::{FixedClock, LocalClock};
pub use db::DbAdapter;
pub use memory::InMemoryDb;
