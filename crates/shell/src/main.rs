//! Demo entry point: log in and replay a list of navigations.
//!
//! Usage: `navgate [PATH ...]`. Credentials come from `NAVGATE_USER` and
//! `NAVGATE_PASSWORD` (default: the bundled `admin` demo user).

use std::sync::Arc;

use anyhow::Context;

use navgate_auth::Credentials;
use navgate_shell::{Shell, ShellConfig, TracingUi};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ShellConfig::from_env().context("loading configuration")?;
    navgate_observability::tracing::init(&config.log);

    let shell = Shell::from_config(&config, Arc::new(TracingUi)).context("building shell")?;

    let username = std::env::var("NAVGATE_USER").unwrap_or_else(|_| "admin".to_string());
    let password = std::env::var("NAVGATE_PASSWORD").unwrap_or_else(|_| "admin123".to_string());

    let landing = shell
        .login(&Credentials::new(username, password))
        .await
        .context("login failed")?;
    println!("login -> {landing}");

    let mut paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        paths = vec!["/".into(), "/orderlist?page=1".into(), "/payment/1001".into(), "/nowhere".into()];
    }

    for path in &paths {
        let decision = shell.navigate(path).await;
        println!("{path} -> {decision}");
    }

    let tabs = shell.guard().worktabs();
    let titles: Vec<&str> = tabs.tabs().iter().map(|t| t.title.as_str()).collect();
    println!("tabs: {}", titles.join(" | "));

    println!("logout -> {}", shell.logout().await);
    Ok(())
}
