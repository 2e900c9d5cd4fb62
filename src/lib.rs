pub mod config;
pub mod duck;
pub mod error;
pub mod inspect;
pub mod pipeline;
pub mod process;
pub mod sink;
pub mod table;
