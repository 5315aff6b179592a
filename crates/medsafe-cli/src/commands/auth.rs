//! Session commands.

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use colored::Colorize;
use serde_json::json;

use medsafe_core::models::Profile;
use medsafe_core::{LoginCredentials, SignupData};

use crate::output;
use crate::session::AppContext;

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Log in and store the session
    Login(LoginArgs),

    /// Create an account and log in
    Signup(SignupArgs),

    /// End the session and forget stored credentials
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Exchange the refresh token for a new access token
    Refresh,

    /// Show whether a session is stored
    Status,

    /// Change the account password
    ChangePassword(ChangePasswordArgs),

    /// Change the display nickname
    ChangeNickname(ChangeNicknameArgs),

    /// Ask for the username registered to an email address
    FindUsername(FindUsernameArgs),

    /// Start a password reset
    FindPassword(FindPasswordArgs),
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long, env = "MEDSAFE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct SignupArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub email: String,

    #[arg(long, env = "MEDSAFE_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Display name
    #[arg(long)]
    pub name: String,
}

#[derive(Args, Debug)]
pub struct ChangePasswordArgs {
    #[arg(long)]
    pub current: String,

    #[arg(long)]
    pub new: String,
}

#[derive(Args, Debug)]
pub struct ChangeNicknameArgs {
    pub nickname: String,
}

#[derive(Args, Debug)]
pub struct FindUsernameArgs {
    #[arg(long)]
    pub email: String,
}

#[derive(Args, Debug)]
pub struct FindPasswordArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub email: String,
}

pub async fn handle(cmd: AuthCommand, ctx: &AppContext) -> Result<()> {
    match cmd.command {
        AuthSubcommand::Login(args) => login(args, ctx).await,
        AuthSubcommand::Signup(args) => signup(args, ctx).await,
        AuthSubcommand::Logout => logout(ctx).await,
        AuthSubcommand::Whoami => whoami(ctx).await,
        AuthSubcommand::Refresh => refresh(ctx).await,
        AuthSubcommand::Status => status(ctx).await,
        AuthSubcommand::ChangePassword(args) => {
            let reply = ctx
                .client
                .change_password(&args.current, &args.new)
                .await
                .context("Failed to change password")?;
            acknowledge(ctx, &reply.message, "Password changed")
        }
        AuthSubcommand::ChangeNickname(args) => {
            let reply = ctx
                .client
                .change_nickname(&args.nickname)
                .await
                .context("Failed to change nickname")?;
            acknowledge(ctx, &reply.message, "Nickname changed")
        }
        AuthSubcommand::FindUsername(args) => {
            let reply = ctx
                .client
                .find_username(&args.email)
                .await
                .context("Failed to look up username")?;
            acknowledge(ctx, &reply.message, "Request sent")
        }
        AuthSubcommand::FindPassword(args) => {
            let reply = ctx
                .client
                .find_password(&args.username, &args.email)
                .await
                .context("Failed to start password reset")?;
            acknowledge(ctx, &reply.message, "Request sent")
        }
    }
}

async fn login(args: LoginArgs, ctx: &AppContext) -> Result<()> {
    output::hint("Logging in...");
    let credentials = LoginCredentials::new(args.username, args.password);
    let session = ctx
        .client
        .login(&credentials)
        .await
        .context("Failed to log in")?;

    if ctx.json {
        return output::json_pretty(&session.profile);
    }
    output::success("Logged in successfully");
    if let Some(profile) = &session.profile {
        println!();
        print_profile(profile);
    }
    Ok(())
}

async fn signup(args: SignupArgs, ctx: &AppContext) -> Result<()> {
    output::hint("Creating account...");
    let data = SignupData::new(args.username, args.email, args.password, args.name);
    let session = ctx
        .client
        .signup(&data)
        .await
        .context("Failed to sign up")?;

    if ctx.json {
        return output::json_pretty(&session.profile);
    }
    output::success("Account created and logged in");
    if let Some(profile) = &session.profile {
        println!();
        print_profile(profile);
    }
    Ok(())
}

async fn logout(ctx: &AppContext) -> Result<()> {
    ctx.client.logout().await.context("Failed to log out")?;
    if !ctx.json {
        output::success("Logged out");
    }
    Ok(())
}

async fn whoami(ctx: &AppContext) -> Result<()> {
    if !ctx.client.is_authenticated().await {
        bail!("No active session. Run 'medsafe auth login' first.");
    }
    let profile = ctx.client.me().await.context("Failed to fetch profile")?;

    if ctx.json {
        return output::json_pretty(&profile);
    }
    print_profile(&profile);
    Ok(())
}

async fn refresh(ctx: &AppContext) -> Result<()> {
    ctx.client
        .refresh()
        .await
        .context("Failed to refresh session")?;
    if !ctx.json {
        output::success("Session refreshed");
    }
    Ok(())
}

async fn status(ctx: &AppContext) -> Result<()> {
    let state = ctx.client.state().await;
    let credential = ctx
        .client
        .credential()
        .await
        .context("Failed to read credential store")?;
    let profile = ctx
        .client
        .stored_profile()
        .await
        .context("Failed to read credential store")?;
    let has_refresh_token = credential
        .as_ref()
        .is_some_and(|c| c.refresh_token.is_some());

    if ctx.json {
        return output::json_pretty(&json!({
            "state": state.to_string(),
            "has_refresh_token": has_refresh_token,
            "user": profile,
        }));
    }

    if state.is_authenticated() {
        output::field("State", &state.to_string().green().to_string());
    } else {
        output::field("State", &state.to_string().yellow().to_string());
    }
    output::field("Refresh token", if has_refresh_token { "stored" } else { "none" });
    if let Some(profile) = &profile {
        output::field("User", profile.display_name());
    }
    Ok(())
}

fn acknowledge(ctx: &AppContext, message: &str, fallback: &str) -> Result<()> {
    if ctx.json {
        return output::json_pretty(&json!({ "message": message }));
    }
    output::success(if message.is_empty() { fallback } else { message });
    Ok(())
}

fn print_profile(profile: &Profile) {
    output::field("ID", &profile.id);
    output::field_opt("Username", profile.username.as_deref());
    output::field_opt("Email", profile.email.as_deref());
    output::field("Name", profile.display_name());
}
