//! Domain models for Quill entities.

pub mod license;
pub mod member;
pub mod page;
pub mod workspace;

pub use license::{CreateWorkspaceLicense, SyncedLicenseUpdate, WorkspaceLicense};
pub use member::{CreateMember, Role, WorkspaceMember};
pub use page::{CreatePage, Page, PageAccess, UpdatePage};
pub use workspace::{CreateWorkspace, Workspace};
