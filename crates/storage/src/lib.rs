#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod json;
#[allow(clippy::module_name_repetitions)]
pub mod memory;

pub use memory::InMemory;
