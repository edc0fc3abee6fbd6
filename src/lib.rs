#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate prometheus;

pub mod api;
pub mod catalog;
pub mod metrics;
pub mod model;
pub mod probe;
pub mod sensor;
pub mod settings;
mod setup;
#[cfg(test)]
mod testing;

pub use api::{hash_password, Error, GrowattApi, Portal};
pub use setup::setup;
