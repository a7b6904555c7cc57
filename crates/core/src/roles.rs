//! Well-known role name constants.
//!
//! These must match the seed data in `20260101000001_create_accounts.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_TRAINER: &str = "trainer";
pub const ROLE_USER: &str = "user";

/// Seeded role ids, in seed order.
pub const ROLE_ID_ADMIN: i64 = 1;
pub const ROLE_ID_TRAINER: i64 = 2;
pub const ROLE_ID_USER: i64 = 3;

/// Whether `role` may act on behalf of trainers (trainers and admins).
pub fn is_staff(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_TRAINER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_roles() {
        assert!(is_staff(ROLE_ADMIN));
        assert!(is_staff(ROLE_TRAINER));
        assert!(!is_staff(ROLE_USER));
        assert!(!is_staff("guest"));
    }
}
