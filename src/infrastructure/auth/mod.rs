//! Authentication infrastructure
//!
//! JWT issuance and validation backed by an HS256 shared secret.

mod jwt;

pub use jwt::{JwtClaims, JwtConfig, JwtGenerator, JwtService};
