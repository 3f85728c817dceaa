use crate::error::AppError;
use crate::models::Campaign;

/// True when one more participant still fits under the campaign's `members` cap.
///
/// `active` must be counted in the same atomic unit that will perform the insert.
pub fn can_join(campaign: &Campaign, active: i64) -> bool {
    active < i64::from(campaign.members)
}

pub fn ensure_room(campaign: &Campaign, active: i64) -> Result<(), AppError> {
    if can_join(campaign, active) {
        Ok(())
    } else {
        Err(AppError::CapacityExceeded {
            capacity: campaign.members,
        })
    }
}
