pub mod clients;
pub mod database;
pub mod repositories;
pub mod security;
pub mod time;
pub mod util;
