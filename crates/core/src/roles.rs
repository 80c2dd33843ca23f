//! Well-known role name constants.
//!
//! These must match the `CHECK` constraint on `users.role` and the `role`
//! claim carried by access tokens.

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_RPM: &str = "RPM";
pub const ROLE_TALENT: &str = "TALENT";

/// All valid role values.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_RPM, ROLE_TALENT];

/// Returns `true` for the administrative review role.
pub fn is_admin(role: &str) -> bool {
    role == ROLE_ADMIN
}
