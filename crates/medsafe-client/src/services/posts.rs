//! Community posts.

use tracing::instrument;

use medsafe_core::models::{ImageUpload, LikeStatus, NewPost, Page, Post, PostUpdate};
use medsafe_core::{MultipartForm, OutgoingRequest, Result, Transport};

use crate::client::ApiClient;
use crate::http::endpoints::{self, POSTS};

const IMAGE_FIELD: &str = "file";

/// Paging and filtering for [`ApiClient::list_posts`].
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    /// Zero-based page index.
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub category: Option<String>,
}

impl<T: Transport> ApiClient<T> {
    #[instrument(skip(self))]
    pub async fn list_posts(&self, query: &PostQuery) -> Result<Page<Post>> {
        let request = OutgoingRequest::get(endpoints::path(&[POSTS]))
            .query_opt("page", query.page)
            .query_opt("size", query.size)
            .query_opt("category", query.category.as_deref());
        self.request(request).await
    }

    #[instrument(skip(self))]
    pub async fn post_detail(&self, id: &str) -> Result<Post> {
        self.get(&endpoints::path(&[POSTS, id])).await
    }

    #[instrument(skip(self, post), fields(title = %post.title))]
    pub async fn create_post(&self, post: &NewPost) -> Result<Post> {
        self.post(&endpoints::path(&[POSTS]), post).await
    }

    #[instrument(skip(self, post))]
    pub async fn update_post(&self, id: &str, post: &PostUpdate) -> Result<Post> {
        self.put(&endpoints::path(&[POSTS, id]), post).await
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, id: &str) -> Result<()> {
        self.delete(&endpoints::path(&[POSTS, id])).await
    }

    #[instrument(skip(self))]
    pub async fn like_post(&self, id: &str) -> Result<LikeStatus> {
        self.post_empty(&endpoints::path(&[POSTS, id, "like"])).await
    }

    #[instrument(skip(self))]
    pub async fn unlike_post(&self, id: &str) -> Result<LikeStatus> {
        self.post_empty(&endpoints::path(&[POSTS, id, "unlike"])).await
    }

    /// Upload an image to embed in a post. Returns its public URL.
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub async fn upload_post_image(&self, filename: &str, bytes: Vec<u8>) -> Result<ImageUpload> {
        let form = MultipartForm::new().file(IMAGE_FIELD, filename, bytes);
        self.upload(endpoints::POST_IMAGES, form).await
    }
}
