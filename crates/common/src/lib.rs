//! Common types shared across `field-cipher` crates: the error taxonomy and
//! the encoded token that crosses the engine boundary.

pub mod error;
pub mod token;

pub use error::CipherError;
pub use token::EncodedToken;
