use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "application_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub fn to_str(&self) -> &str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Withdrawn => "withdrawn",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ApplicationStatus::Pending)
    }

    /// pending may move to any of the three terminal states; terminal states
    /// never transition again.
    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        match self {
            ApplicationStatus::Pending => next != ApplicationStatus::Pending,
            _ => false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub worker_id: Uuid,
    pub status: ApplicationStatus,
    pub cover_message: Option<String>,
    pub applied_at: DateTime<Utc>,

    // Employer response
    pub response_message: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_can_reach_every_terminal_state() {
        assert!(ApplicationStatus::Pending.can_transition_to(ApplicationStatus::Accepted));
        assert!(ApplicationStatus::Pending.can_transition_to(ApplicationStatus::Rejected));
        assert!(ApplicationStatus::Pending.can_transition_to(ApplicationStatus::Withdrawn));
    }

    #[test]
    fn test_pending_cannot_transition_to_itself() {
        assert!(!ApplicationStatus::Pending.can_transition_to(ApplicationStatus::Pending));
    }

    #[test]
    fn test_terminal_states_are_frozen() {
        for terminal in [
            ApplicationStatus::Accepted,
            ApplicationStatus::Rejected,
            ApplicationStatus::Withdrawn,
        ] {
            assert!(terminal.is_terminal());
            for next in [
                ApplicationStatus::Pending,
                ApplicationStatus::Accepted,
                ApplicationStatus::Rejected,
                ApplicationStatus::Withdrawn,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }
}
