//! Inspection workflow: `draft → in_progress → completed → approved`, with
//! `in_progress → draft` as the only step back.

use crate::{
    api::error,
    modules::{inspection::schema::InspectionStatus, user::schema::UserRole},
};

pub fn is_allowed(from: InspectionStatus, to: InspectionStatus) -> bool {
    use InspectionStatus::*;
    matches!(
        (from, to),
        (Draft, InProgress) | (InProgress, Draft) | (InProgress, Completed) | (Completed, Approved)
    )
}

/// Validates a status change requested by `role`. Re-submitting the current status is a no-op.
pub fn check_transition(
    from: InspectionStatus,
    to: InspectionStatus,
    role: UserRole,
) -> Result<(), error::SystemError> {
    if from == to {
        return Ok(());
    }
    if !is_allowed(from, to) {
        return Err(error::SystemError::bad_request(format!(
            "Cannot move an inspection from {} to {}",
            from.as_str(),
            to.as_str()
        )));
    }
    if to == InspectionStatus::Approved && !role.is_admin() {
        return Err(error::SystemError::forbidden("Only admins can approve inspections"));
    }
    Ok(())
}

/// `completed_at` after the transition: stamped on completion, cleared on a return to draft.
pub fn completed_at_after(
    to: InspectionStatus,
    current: Option<chrono::DateTime<chrono::Utc>>,
    now: chrono::DateTime<chrono::Utc>,
) -> Option<chrono::DateTime<chrono::Utc>> {
    match to {
        InspectionStatus::Completed => Some(now),
        InspectionStatus::Draft | InspectionStatus::InProgress => None,
        InspectionStatus::Approved => current.or(Some(now)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use InspectionStatus::*;

    #[test]
    fn forward_path_is_allowed() {
        assert!(check_transition(Draft, InProgress, UserRole::Inspector).is_ok());
        assert!(check_transition(InProgress, Completed, UserRole::Inspector).is_ok());
        assert!(check_transition(Completed, Approved, UserRole::Admin).is_ok());
    }

    #[test]
    fn only_in_progress_may_return_to_draft() {
        assert!(check_transition(InProgress, Draft, UserRole::Inspector).is_ok());
        assert!(matches!(
            check_transition(Completed, Draft, UserRole::Admin),
            Err(error::SystemError::BadRequest(_))
        ));
        assert!(check_transition(Approved, Draft, UserRole::SuperAdmin).is_err());
    }

    #[test]
    fn steps_cannot_be_skipped() {
        assert!(check_transition(Draft, Completed, UserRole::Admin).is_err());
        assert!(check_transition(Draft, Approved, UserRole::SuperAdmin).is_err());
        assert!(check_transition(InProgress, Approved, UserRole::Admin).is_err());
    }

    #[test]
    fn approval_needs_an_admin() {
        assert!(matches!(
            check_transition(Completed, Approved, UserRole::Inspector),
            Err(error::SystemError::Forbidden(_))
        ));
        assert!(check_transition(Completed, Approved, UserRole::SuperAdmin).is_ok());
    }

    #[test]
    fn same_status_is_a_no_op() {
        assert!(check_transition(Approved, Approved, UserRole::Viewer).is_ok());
    }

    #[test]
    fn completion_stamps_time() {
        let now = chrono::Utc::now();
        let earlier = now - chrono::Duration::hours(2);

        assert_eq!(completed_at_after(Completed, None, now), Some(now));
        assert_eq!(completed_at_after(Approved, Some(earlier), now), Some(earlier));
        assert_eq!(completed_at_after(Draft, None, now), None);
    }
}
