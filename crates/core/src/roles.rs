//! Well-known role name constants.
//!
//! These must match the values issued in access-token `role` claims.

pub const ROLE_SUPER_ADMIN: &str = "super_admin";
pub const ROLE_PLACEMENT_REP: &str = "placement_rep";
pub const ROLE_CLASS_REP: &str = "class_rep";
pub const ROLE_STUDENT: &str = "student";

/// Roles allowed to verify or reject round outcomes and to record offers.
pub const VERIFICATION_ROLES: &[&str] = &[ROLE_SUPER_ADMIN, ROLE_PLACEMENT_REP, ROLE_CLASS_REP];

/// Roles allowed to create drives and rounds.
pub const ADMIN_ROLES: &[&str] = &[ROLE_SUPER_ADMIN, ROLE_PLACEMENT_REP];

/// Roles that own a student record and may submit outcomes.
///
/// Class reps are students too.
pub const STUDENT_ROLES: &[&str] = &[ROLE_STUDENT, ROLE_CLASS_REP];

pub fn can_verify(role: &str) -> bool {
    VERIFICATION_ROLES.contains(&role)
}

pub fn can_administer(role: &str) -> bool {
    ADMIN_ROLES.contains(&role)
}

pub fn is_student(role: &str) -> bool {
    STUDENT_ROLES.contains(&role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_rep_is_both_student_and_verifier() {
        assert!(is_student(ROLE_CLASS_REP));
        assert!(can_verify(ROLE_CLASS_REP));
        assert!(!can_administer(ROLE_CLASS_REP));
    }

    #[test]
    fn plain_student_cannot_verify() {
        assert!(is_student(ROLE_STUDENT));
        assert!(!can_verify(ROLE_STUDENT));
    }

    #[test]
    fn placement_rep_administers_but_is_not_a_student() {
        assert!(can_administer(ROLE_PLACEMENT_REP));
        assert!(can_verify(ROLE_PLACEMENT_REP));
        assert!(!is_student(ROLE_PLACEMENT_REP));
    }

    #[test]
    fn unknown_role_has_no_capabilities() {
        assert!(!can_verify("guest"));
        assert!(!can_administer("guest"));
        assert!(!is_student("guest"));
    }
}
