//! `open` subcommand: resolve a page path against the current session.
//!
//! Mirrors the web client's navigation: the path is parsed into a route,
//! the admin branch is checked against the restored session, and the page's
//! query (if any) is fetched through the cache. A denied or unknown path
//! prints the redirect and fetches nothing.

use std::io::{self, Write};

use crate::context::AppContext;
use roombook_client::routes::{self, Resolution, Route};
use roombook_client::QueryStatus;

/// Execute the open subcommand.
pub async fn run(ctx: &AppContext, path: &str) -> anyhow::Result<()> {
    let mut out = io::stdout();
    let snapshot = ctx.session.snapshot();
    match routes::resolve(path, &snapshot) {
        Resolution::Redirect(target) => {
            writeln!(out, "Redirected to {}", target.path())?;
        }
        Resolution::Render(route) => {
            writeln!(out, "Rendering {}", route.path())?;
            render(ctx, &mut out, &route).await?;
        }
    }
    Ok(())
}

async fn render(ctx: &AppContext, out: &mut impl Write, route: &Route) -> anyhow::Result<()> {
    let mut sub = ctx.cache.subscribe_opt(route.query());
    if !sub.is_active() {
        return Ok(());
    }
    let entry = sub.ready().await;
    match entry.status {
        QueryStatus::Error(message) => writeln!(out, "Error: {message}")?,
        QueryStatus::Success => {
            let count = entry
                .data
                .as_ref()
                .and_then(serde_json::Value::as_array)
                .map(Vec::len);
            match count {
                Some(n) => writeln!(out, "{n} item(s) loaded.")?,
                None => writeln!(out, "Loaded.")?,
            }
        }
        _ => writeln!(out, "No data.")?,
    }
    Ok(())
}
