#![allow(clippy::module_inception)]
#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate cfg_if;
#[macro_use]
extern crate log;

pub(crate) mod builtin;
pub mod config;
pub(crate) mod error;
pub mod hosts;
pub mod logger;
pub mod validator;

pub use error::Error;

pub type Result<T> = anyhow::Result<T>;

pub use builtin::setup_logger;
pub use validator::{validate_domain, validate_port};
