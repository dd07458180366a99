//! Directory operations, used to address latency, failures and call counts

use std::fmt;

/// One of the calls offered by the directory service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectoryOperation {
    AccountStatus,
    CurrentAccountId,
    AccountRecord,
    QueryRecords,
    SaveRecord,
    DeleteRecord,
}

impl DirectoryOperation {
    pub const ALL: [DirectoryOperation; 6] = [
        Self::AccountStatus,
        Self::CurrentAccountId,
        Self::AccountRecord,
        Self::QueryRecords,
        Self::SaveRecord,
        Self::DeleteRecord,
    ];

    /// Slot in per-operation arrays
    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccountStatus => "account_status",
            Self::CurrentAccountId => "current_account_id",
            Self::AccountRecord => "account_record",
            Self::QueryRecords => "query_records",
            Self::SaveRecord => "save_record",
            Self::DeleteRecord => "delete_record",
        }
    }
}

impl fmt::Display for DirectoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
