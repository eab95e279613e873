//! Request data types.
//!
//! Everything here is read-only once the client has built it.

mod package;
mod request;

pub use package::{FileEntry, PackageSnapshot};
pub use request::{
    Action, ActionKind, Assignee, Issue, PackageRef, Request, RequestState, Review, ReviewTarget,
    RoleAssignment,
};
