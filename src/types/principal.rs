use crate::db::types::UserRecord;

/// The authenticated actor of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: i64,
    pub is_admin: bool,
}

impl Principal {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            is_admin: false,
        }
    }

    pub fn admin(id: i64) -> Self {
        Self { id, is_admin: true }
    }
}

impl From<&UserRecord> for Principal {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            is_admin: user.admin,
        }
    }
}
