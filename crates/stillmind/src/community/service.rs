use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;

use crate::assessments::domain::UserId;
use crate::storage::RepositoryError;

use super::domain::{CommunityPost, PostComment, PostId, PostView};
use super::repository::CommunityRepository;

/// Inbound body for creating a post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPost {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Inbound body for commenting on a post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewComment {
    #[serde(default)]
    pub content: Option<String>,
}

static POST_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static COMMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_post_id() -> PostId {
    let id = POST_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    PostId(format!("post-{id:06}"))
}

fn next_comment_id() -> String {
    let id = COMMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("cmt-{id:06}")
}

/// Service composing feed validation and the community repository.
pub struct CommunityService<R> {
    repository: Arc<R>,
}

impl<R> CommunityService<R>
where
    R: CommunityRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn create_post(
        &self,
        author: &UserId,
        post: NewPost,
    ) -> Result<CommunityPost, CommunityServiceError> {
        let title = post
            .title
            .filter(|value| !value.trim().is_empty())
            .ok_or(CommunityServiceError::MissingFields)?;
        let body = post
            .body
            .filter(|value| !value.trim().is_empty())
            .ok_or(CommunityServiceError::MissingFields)?;

        let record = CommunityPost {
            id: next_post_id(),
            author: author.clone(),
            title,
            body,
            image_url: post.image_url,
            created_at: Utc::now(),
        };

        let stored = self.repository.insert_post(record)?;
        Ok(stored)
    }

    /// The full feed, newest first, with like and comment counts attached.
    pub fn feed(&self) -> Result<Vec<PostView>, CommunityServiceError> {
        let mut posts = self.repository.list_posts()?;
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut views = Vec::with_capacity(posts.len());
        for post in posts {
            let like_count = self.repository.like_count(&post.id)?;
            let comment_count = self.repository.comment_count(&post.id)?;
            views.push(PostView {
                post,
                like_count,
                comment_count,
            });
        }
        Ok(views)
    }

    /// At most one like per user per post.
    pub fn like(&self, post_id: &PostId, user: &UserId) -> Result<(), CommunityServiceError> {
        if self.repository.fetch_post(post_id)?.is_none() {
            return Err(RepositoryError::NotFound.into());
        }
        if self.repository.insert_like(post_id, user)? {
            Ok(())
        } else {
            Err(CommunityServiceError::AlreadyLiked)
        }
    }

    pub fn comment(
        &self,
        post_id: &PostId,
        author: &UserId,
        comment: NewComment,
    ) -> Result<PostComment, CommunityServiceError> {
        let content = comment
            .content
            .filter(|value| !value.trim().is_empty())
            .ok_or(CommunityServiceError::MissingContent)?;

        if self.repository.fetch_post(post_id)?.is_none() {
            return Err(RepositoryError::NotFound.into());
        }

        let record = PostComment {
            id: next_comment_id(),
            post_id: post_id.clone(),
            author: author.clone(),
            content,
            created_at: Utc::now(),
        };

        let stored = self.repository.insert_comment(record)?;
        Ok(stored)
    }
}

/// Error raised by the community service.
#[derive(Debug, thiserror::Error)]
pub enum CommunityServiceError {
    #[error("title and body are required")]
    MissingFields,
    #[error("missing content")]
    MissingContent,
    #[error("already liked")]
    AlreadyLiked,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
