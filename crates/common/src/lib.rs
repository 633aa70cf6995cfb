//! Common types shared across `credseal` crates: the capsule wire format,
//! JSON protocol bodies, and the service error taxonomy.

pub mod capsule;
pub mod error;
pub mod protocol;

pub use capsule::Capsule;
pub use error::ServiceError;
