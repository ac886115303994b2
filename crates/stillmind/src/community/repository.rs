use crate::assessments::domain::UserId;
use crate::storage::RepositoryError;

use super::domain::{CommunityPost, PostComment, PostId};

/// Storage abstraction for the community feed.
pub trait CommunityRepository: Send + Sync {
    fn insert_post(&self, post: CommunityPost) -> Result<CommunityPost, RepositoryError>;
    fn list_posts(&self) -> Result<Vec<CommunityPost>, RepositoryError>;
    fn fetch_post(&self, id: &PostId) -> Result<Option<CommunityPost>, RepositoryError>;
    /// Returns `false` when the user already liked the post.
    fn insert_like(&self, post: &PostId, user: &UserId) -> Result<bool, RepositoryError>;
    fn insert_comment(&self, comment: PostComment) -> Result<PostComment, RepositoryError>;
    fn like_count(&self, post: &PostId) -> Result<usize, RepositoryError>;
    fn comment_count(&self, post: &PostId) -> Result<usize, RepositoryError>;
}
