//! Community feed: posts, likes, and comments.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{CommunityPost, PostComment, PostId, PostView};
pub use repository::CommunityRepository;
pub use router::community_router;
pub use service::{CommunityService, CommunityServiceError, NewComment, NewPost};
