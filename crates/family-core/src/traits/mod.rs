//! Ports implemented by the infrastructure layer

mod directory;

pub use directory::{
    DirectoryRecord, DirectoryResult, DirectoryService, MemberFields, MEMBER_RECORD_TYPE,
};
