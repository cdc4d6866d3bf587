use std::io::{self, BufRead};

use serde_json::json;
use tracing::info;

use crate::api::session::{self, AuthSession};
use crate::cli::commands::ConfigCommands;
use crate::cli::{report, Context};
use crate::config;
use crate::error::ObraError;
use crate::output;

pub fn run_login(ctx: &Context, email: &str, password: Option<&str>) -> i32 {
    report(login(ctx, email, password), ctx.json)
}

pub fn run_logout(ctx: &Context) -> i32 {
    report(logout(ctx), ctx.json)
}

pub fn run_whoami(ctx: &Context) -> i32 {
    report(whoami(ctx), ctx.json)
}

pub fn run_config(ctx: &Context, cmd: ConfigCommands) -> i32 {
    let result = match cmd {
        ConfigCommands::Show => config_show(ctx),
        ConfigCommands::SetUrl { url } => config_set_url(ctx, &url),
    };
    report(result, ctx.json)
}

fn read_password() -> Result<String, ObraError> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn login(ctx: &Context, email: &str, password: Option<&str>) -> Result<i32, ObraError> {
    let password = match password {
        Some(p) => p.to_string(),
        None => read_password()?,
    };
    let client = ctx.guest_client()?;
    let claims = session::login(&client, email, &password)?;

    ctx.emit(
        json!({
            "email": claims.display_email(),
            "role": claims.role,
            "company_id": claims.cid,
            "landing": claims.landing(),
        }),
        || {
            println!("Signed in as {}", claims.display_email());
            println!("  Landing: {}", claims.landing());
        },
    );
    Ok(0)
}

fn logout(ctx: &Context) -> Result<i32, ObraError> {
    let session = AuthSession::load(config::session_path()?)?;
    let was_signed_in = session.is_signed_in();
    session.sign_out();
    if was_signed_in {
        info!("signed out");
    }
    ctx.emit(json!({ "signed_out": was_signed_in }), || {
        if was_signed_in {
            println!("Signed out.");
        } else {
            println!("Not signed in.");
        }
    });
    Ok(0)
}

fn whoami(ctx: &Context) -> Result<i32, ObraError> {
    let session = AuthSession::load(config::session_path()?)?;
    let claims = session.claims().ok_or_else(ObraError::not_authenticated)?;
    let api_url = ctx.api_url();
    ctx.emit(
        json!({
            "email": claims.display_email(),
            "role": claims.role,
            "company_id": claims.cid,
            "expires_at": claims.exp,
            "api_url": api_url,
        }),
        || output::text::print_claims(&claims, &api_url),
    );
    Ok(0)
}

fn config_show(ctx: &Context) -> Result<i32, ObraError> {
    let home = config::home_dir()?;
    let api_url = ctx.api_url();
    let active = ctx.settings.active_project_id;
    let timeout = ctx.settings.timeout_secs();
    ctx.emit(
        json!({
            "home": home.display().to_string(),
            "api_url": api_url,
            "active_project_id": active,
            "timeout_secs": timeout,
        }),
        || {
            println!("Home: {}", home.display());
            println!("  API URL: {api_url}");
            match active {
                Some(id) => println!("  Active project: {id}"),
                None => println!("  Active project: (none)"),
            }
            println!("  Timeout: {timeout}s");
        },
    );
    Ok(0)
}

fn config_set_url(ctx: &Context, url: &str) -> Result<i32, ObraError> {
    let url = url.trim().trim_end_matches('/');
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ObraError::validation(format!(
            "API URL must start with http:// or https://: {url}"
        )));
    }
    let mut settings = ctx.settings.clone();
    settings.api_url = Some(url.to_string());
    let path = settings.save()?;
    ctx.emit(json!({ "api_url": url, "path": path.display().to_string() }), || {
        println!("API URL set to {url}");
    });
    Ok(0)
}
