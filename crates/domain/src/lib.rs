#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod clock;
mod error;
mod exercise_log;
mod goal;
mod muscle_group;
mod name;
mod recommendation;
mod service;

pub use clock::*;
pub use error::*;
pub use exercise_log::*;
pub use goal::*;
pub use muscle_group::*;
pub use name::*;
pub use recommendation::*;
pub use service::*;
