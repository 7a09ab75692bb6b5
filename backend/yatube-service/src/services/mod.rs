/// Business logic layer
///
/// Every operation takes the requester explicitly; nothing reads identity
/// from ambient request state.
pub mod comments;
pub mod follows;
pub mod groups;
pub mod posts;

pub use comments::CommentService;
pub use follows::FollowService;
pub use groups::GroupService;
pub use posts::{Listing, PostService};
