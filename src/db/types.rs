pub use teloxide::types::UserId;

/// Identifier for a user across both stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserKey(pub u64);

/// Identifier for a saved calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CalculationId(pub i64);

impl std::fmt::Display for UserKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for CalculationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for UserKey {
    fn from(id: UserId) -> Self {
        UserKey(id.0)
    }
}

impl From<UserKey> for UserId {
    fn from(key: UserKey) -> Self {
        UserId(key.0)
    }
}

impl From<u64> for UserKey {
    fn from(id: u64) -> Self {
        UserKey(id)
    }
}

impl From<i64> for CalculationId {
    fn from(id: i64) -> Self {
        CalculationId(id)
    }
}

impl From<CalculationId> for i64 {
    fn from(id: CalculationId) -> Self {
        id.0
    }
}

impl UserKey {
    /// SQLite has no unsigned 64-bit column type.
    pub fn as_i64(self) -> i64 {
        self.0 as i64
    }
}
