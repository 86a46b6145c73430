// tests/support/mocks/mod.rs
pub mod repos;
pub mod time;
pub mod util;

pub use repos::FailingCodeRepo;
pub use time::{MockClock, fixed_now};
pub use util::SequentialCodeGenerator;
