//! Community board bodies.

use serde::{Deserialize, Serialize};

/// One page of a paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(deserialize_with = "super::id::string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "super::id::opt_string_or_number")]
    pub author_id: Option<String>,
    #[serde(default)]
    pub author_nickname: Option<String>,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub comment_count: Option<u32>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

pub type PostUpdate = NewPost;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(deserialize_with = "super::id::string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "super::id::opt_string_or_number")]
    pub post_id: Option<String>,
    #[serde(default)]
    pub author_nickname: Option<String>,
    pub content: String,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment<'a> {
    pub post_id: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentUpdate<'a> {
    pub content: &'a str,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatus {
    pub like_count: u32,
    pub is_liked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUpload {
    pub image_url: String,
}
