#[macro_use] extern crate hex_literal;

mod error;
mod crypto;

pub use error::*;
pub use crypto::*;
