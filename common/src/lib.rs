mod claims;
mod constants;
mod error;
mod user_record;

pub mod user_fields;

pub use claims::CustomClaims;
pub use constants::*;
pub use error::ProviderError;
pub use user_record::{AdminEntry, AuthUser, UserRecord};
