//! Notification channel naming.
//!
//! Each student has a private channel `student-{id}`. The only event the
//! tracker emits on it is [`EVENT_OUTCOME_VERIFIED`].

use crate::types::DbId;

/// Event name pushed to a student's channel once an outcome is verified.
pub const EVENT_OUTCOME_VERIFIED: &str = "outcome-verified";

/// Message body carried in the `outcome-verified` payload.
pub const OUTCOME_VERIFIED_MESSAGE: &str = "Your round outcome has been verified!";

const STUDENT_CHANNEL_PREFIX: &str = "student-";

/// Private channel name for a student.
pub fn student_channel(student_id: DbId) -> String {
    format!("{STUDENT_CHANNEL_PREFIX}{student_id}")
}

/// Recover the student id from a channel name produced by [`student_channel`].
pub fn parse_student_channel(channel: &str) -> Option<DbId> {
    channel
        .strip_prefix(STUDENT_CHANNEL_PREFIX)
        .and_then(|id| id.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_name_embeds_student_id() {
        assert_eq!(student_channel(42), "student-42");
    }

    #[test]
    fn parse_recovers_student_id() {
        assert_eq!(parse_student_channel(&student_channel(7)), Some(7));
    }

    #[test]
    fn parse_rejects_foreign_channels() {
        assert_eq!(parse_student_channel("batch-7"), None);
        assert_eq!(parse_student_channel("student-abc"), None);
        assert_eq!(parse_student_channel("student-"), None);
    }
}
