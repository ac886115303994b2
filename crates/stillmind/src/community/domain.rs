use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assessments::domain::UserId;

/// Identifier wrapper for community posts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostId(pub String);

/// A post shared to the community feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityPost {
    pub id: PostId,
    pub author: UserId,
    pub title: String,
    pub body: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A comment attached to a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostComment {
    pub id: String,
    pub post_id: PostId,
    pub author: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Feed projection of a post together with its engagement counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: CommunityPost,
    pub like_count: usize,
    pub comment_count: usize,
}
