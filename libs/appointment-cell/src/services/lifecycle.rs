use tracing::{debug, warn};

use shared_models::entities::AppointmentStatus;

use crate::models::AppointmentError;

/// Operations that move an appointment through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentAction {
    Reschedule,
    Cancel,
    Complete,
}

impl AppointmentAction {
    pub fn target_status(&self) -> AppointmentStatus {
        match self {
            AppointmentAction::Reschedule => AppointmentStatus::Scheduled,
            AppointmentAction::Cancel => AppointmentStatus::Cancelled,
            AppointmentAction::Complete => AppointmentStatus::Completed,
        }
    }

    fn rejection(&self) -> &'static str {
        match self {
            AppointmentAction::Reschedule => "Cannot reschedule a completed or cancelled appointment.",
            AppointmentAction::Cancel => "Only scheduled appointments can be cancelled.",
            AppointmentAction::Complete => "Only scheduled appointments can be marked as completed.",
        }
    }
}

pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// Checks `action` against the current status and returns the status to store.
    pub fn validate_status_transition(
        &self,
        current_status: AppointmentStatus,
        action: AppointmentAction,
    ) -> Result<AppointmentStatus, AppointmentError> {
        let new_status = action.target_status();
        debug!("Validating status transition from {} to {}", current_status, new_status);

        if !self.get_valid_transitions(current_status).contains(&new_status) {
            warn!("Invalid status transition attempted: {} -> {}", current_status, new_status);
            return Err(AppointmentError::InvalidStatusTransition(action.rejection()));
        }

        Ok(new_status)
    }

    pub fn get_valid_transitions(&self, current_status: AppointmentStatus) -> Vec<AppointmentStatus> {
        match current_status {
            AppointmentStatus::Scheduled => vec![
                AppointmentStatus::Scheduled,
                AppointmentStatus::Completed,
                AppointmentStatus::Cancelled,
            ],
            // Terminal states
            AppointmentStatus::Completed | AppointmentStatus::Cancelled => vec![],
        }
    }
}

impl Default for AppointmentLifecycleService {
    fn default() -> Self {
        Self::new()
    }
}
