//! Community post commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use medsafe_client::PostQuery;
use medsafe_core::models::{NewPost, Post};

use crate::output;
use crate::session::AppContext;

#[derive(Args, Debug)]
pub struct PostCommand {
    #[command(subcommand)]
    pub command: PostSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PostSubcommand {
    /// List posts, newest first
    List(ListArgs),

    /// Show one post
    Show { id: String },

    /// Publish a post
    Create(CreateArgs),

    /// Replace the title and content of one of your posts
    Edit {
        id: String,

        #[command(flatten)]
        post: CreateArgs,
    },

    /// Delete one of your posts
    Delete { id: String },

    /// Like a post
    Like { id: String },

    /// Remove your like from a post
    Unlike { id: String },
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Zero-based page index
    #[arg(long)]
    pub page: Option<u32>,

    #[arg(long)]
    pub size: Option<u32>,

    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub content: String,

    #[arg(long)]
    pub category: Option<String>,
}

pub async fn handle(cmd: PostCommand, ctx: &AppContext) -> Result<()> {
    match cmd.command {
        PostSubcommand::List(args) => {
            let query = PostQuery {
                page: args.page,
                size: args.size,
                category: args.category,
            };
            let page = ctx
                .client
                .list_posts(&query)
                .await
                .context("Failed to list posts")?;

            if ctx.json {
                return output::json_pretty(&page);
            }
            if page.is_empty() {
                output::hint("No posts found.");
                return Ok(());
            }
            for post in &page.content {
                print_summary(post);
            }
            if !page.last {
                eprintln!();
                output::hint(&format!(
                    "Page {} of {}. Next: --page {}",
                    page.number + 1,
                    page.total_pages,
                    page.number + 1
                ));
            }
        }
        PostSubcommand::Show { id } => {
            let post = ctx
                .client
                .post_detail(&id)
                .await
                .context("Failed to fetch post")?;

            if ctx.json {
                return output::json_pretty(&post);
            }
            println!("{}", post.title.bold());
            output::field_opt("Author", post.author_nickname.as_deref());
            output::field_opt("Category", post.category.as_deref());
            if let Some(created_at) = &post.created_at {
                output::field("Posted", &output::timestamp(created_at));
            }
            output::field("Likes", &post.like_count.to_string());
            println!();
            println!("{}", post.content);
        }
        PostSubcommand::Create(args) => {
            let post = NewPost {
                title: args.title,
                content: args.content,
                category: args.category,
            };
            let created = ctx
                .client
                .create_post(&post)
                .await
                .context("Failed to create post")?;

            if ctx.json {
                return output::json_pretty(&created);
            }
            output::success("Post published");
            output::field("ID", &created.id);
        }
        PostSubcommand::Edit { id, post } => {
            let update = NewPost {
                title: post.title,
                content: post.content,
                category: post.category,
            };
            let updated = ctx
                .client
                .update_post(&id, &update)
                .await
                .context("Failed to update post")?;

            if ctx.json {
                return output::json_pretty(&updated);
            }
            output::success(&format!("Updated post {}", updated.id));
        }
        PostSubcommand::Delete { id } => {
            ctx.client
                .delete_post(&id)
                .await
                .context("Failed to delete post")?;
            if !ctx.json {
                output::success(&format!("Deleted post {}", id));
            }
        }
        PostSubcommand::Like { id } => {
            let status = ctx
                .client
                .like_post(&id)
                .await
                .context("Failed to like post")?;
            if ctx.json {
                return output::json_pretty(&status);
            }
            output::success(&format!("Liked ({} likes)", status.like_count));
        }
        PostSubcommand::Unlike { id } => {
            let status = ctx
                .client
                .unlike_post(&id)
                .await
                .context("Failed to unlike post")?;
            if ctx.json {
                return output::json_pretty(&status);
            }
            output::success(&format!("Like removed ({} likes)", status.like_count));
        }
    }
    Ok(())
}

fn print_summary(post: &Post) {
    let author = post.author_nickname.as_deref().unwrap_or("anonymous");
    let when = post
        .created_at
        .as_deref()
        .map(output::timestamp)
        .unwrap_or_default();
    println!(
        "{}  {}  {} {}  {}",
        post.id,
        post.title,
        author.dimmed(),
        when.dimmed(),
        format!("♥ {}", post.like_count).red()
    );
}
