//! Comment commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use crate::output;
use crate::session::AppContext;

#[derive(Args, Debug)]
pub struct CommentCommand {
    #[command(subcommand)]
    pub command: CommentSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CommentSubcommand {
    /// List comments on a post
    List {
        post_id: String,

        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        size: Option<u32>,
    },

    /// Comment on a post
    Add { post_id: String, content: String },

    /// Edit one of your comments
    Edit { id: String, content: String },

    /// Delete one of your comments
    Delete { id: String },

    /// Like a comment
    Like { id: String },
}

pub async fn handle(cmd: CommentCommand, ctx: &AppContext) -> Result<()> {
    match cmd.command {
        CommentSubcommand::List {
            post_id,
            page,
            size,
        } => {
            let comments = ctx
                .client
                .list_comments(&post_id, page, size)
                .await
                .context("Failed to list comments")?;

            if ctx.json {
                return output::json_pretty(&comments);
            }
            if comments.is_empty() {
                output::hint("No comments yet.");
                return Ok(());
            }
            for comment in &comments.content {
                let author = comment.author_nickname.as_deref().unwrap_or("anonymous");
                println!("{}  {}  {}", comment.id, author.dimmed(), comment.content);
            }
        }
        CommentSubcommand::Add { post_id, content } => {
            let comment = ctx
                .client
                .add_comment(&post_id, &content)
                .await
                .context("Failed to add comment")?;
            if ctx.json {
                return output::json_pretty(&comment);
            }
            output::success("Comment added");
            output::field("ID", &comment.id);
        }
        CommentSubcommand::Edit { id, content } => {
            let comment = ctx
                .client
                .update_comment(&id, &content)
                .await
                .context("Failed to edit comment")?;
            if ctx.json {
                return output::json_pretty(&comment);
            }
            output::success("Comment updated");
        }
        CommentSubcommand::Delete { id } => {
            ctx.client
                .delete_comment(&id)
                .await
                .context("Failed to delete comment")?;
            if !ctx.json {
                output::success(&format!("Deleted comment {}", id));
            }
        }
        CommentSubcommand::Like { id } => {
            let status = ctx
                .client
                .like_comment(&id)
                .await
                .context("Failed to like comment")?;
            if ctx.json {
                return output::json_pretty(&status);
            }
            output::success(&format!("Liked ({} likes)", status.like_count));
        }
    }
    Ok(())
}
