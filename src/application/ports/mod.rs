pub mod authorization_code;
pub mod clients;
pub mod security;
pub mod time;
pub mod util;

