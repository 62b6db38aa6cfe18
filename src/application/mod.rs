mod application;
pub mod console;
pub mod data;
mod runtime_config;

pub use application::{Application, ApplicationError, Outcome};
pub(crate) use application::{MirrorFileSnafu, MissingSettingSnafu};
pub use runtime_config::RuntimeConfig;
