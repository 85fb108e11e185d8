pub mod error;
pub mod file;
pub mod gen;
pub mod log;
pub mod neighborhood;
pub mod sim;
pub mod time;
pub mod utils;
