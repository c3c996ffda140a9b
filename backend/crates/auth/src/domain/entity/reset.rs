//! Password Reset Entity

use kernel::id::UserId;

use crate::domain::value_object::one_time_code::OneTimeCode;

/// A reset code issued to a user. Only the latest one counts.
#[derive(Debug, Clone)]
pub struct ResetToken {
    pub user_id: UserId,
    pub code: OneTimeCode,
}
