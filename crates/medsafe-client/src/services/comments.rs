//! Comments on community posts.

use tracing::instrument;

use medsafe_core::models::{Comment, CommentUpdate, LikeStatus, NewComment, Page};
use medsafe_core::{OutgoingRequest, Result, Transport};

use crate::client::ApiClient;
use crate::http::endpoints::{self, COMMENTS};

impl<T: Transport> ApiClient<T> {
    #[instrument(skip(self))]
    pub async fn list_comments(
        &self,
        post_id: &str,
        page: Option<u32>,
        size: Option<u32>,
    ) -> Result<Page<Comment>> {
        let request = OutgoingRequest::get(endpoints::path(&[COMMENTS, "post", post_id]))
            .query_opt("page", page)
            .query_opt("size", size);
        self.request(request).await
    }

    #[instrument(skip(self, content))]
    pub async fn add_comment(&self, post_id: &str, content: &str) -> Result<Comment> {
        self.post(
            &endpoints::path(&[COMMENTS]),
            &NewComment { post_id, content },
        )
        .await
    }

    #[instrument(skip(self, content))]
    pub async fn update_comment(&self, id: &str, content: &str) -> Result<Comment> {
        self.put(&endpoints::path(&[COMMENTS, id]), &CommentUpdate { content })
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_comment(&self, id: &str) -> Result<()> {
        self.delete(&endpoints::path(&[COMMENTS, id])).await
    }

    #[instrument(skip(self))]
    pub async fn like_comment(&self, id: &str) -> Result<LikeStatus> {
        self.post_empty(&endpoints::path(&[COMMENTS, id, "like"])).await
    }
}
