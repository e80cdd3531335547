#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
pub mod error;
pub mod fs;
pub mod launch;
pub mod launcher_config;
pub mod options;
pub mod store;

pub mod consts;

pub use consts::*;
pub use error::Error;
