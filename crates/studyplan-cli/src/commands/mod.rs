pub mod config;
pub mod fetch;
pub mod generate;
pub mod input;
pub mod locate;
pub mod month;
pub mod timer;
pub mod week;
