//! Request authentication (HTTP Basic against stored Argon2 digests) and
//! course ownership checks.

pub mod basic;
pub mod gate;
pub mod ownership;
pub mod password;

pub use basic::Credentials;
pub use gate::{authenticate, AuthError, AuthFailure, AuthenticatedContext};
pub use ownership::{authorize, AuthzFailure, Owned};
pub use password::{Argon2Params, PasswordError, PasswordHasher};
