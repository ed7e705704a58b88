use std::path::{Path, PathBuf};
use std::sync::Arc;

use askvote_client::config::{self, ClientConfig, ENV_BASE_URL};
use askvote_client::http::HttpTransport;
use askvote_core::models::button::{ButtonRole, ButtonState};
use askvote_core::models::target::VoteTarget;
use askvote_core::page_keys::CSRF_COOKIE;
use askvote_page::document::Document;
use askvote_page::events::{ClickEvent, ClickOutcome};
use askvote_page::handler::VoteHandler;
use eyre::{Result, bail, eyre};

pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(config::config_path()?),
    }
}

/// Config file if present, else a bare config from the environment.
/// Environment variables override file values either way.
pub fn resolve_config(path: &Path) -> Result<ClientConfig> {
    let base = if path.exists() {
        config::load_config_from(path)?
    } else if let Ok(base_url) = std::env::var(ENV_BASE_URL) {
        ClientConfig::new(base_url)
    } else {
        bail!(
            "no config at {}; run `askvote config init` or set {ENV_BASE_URL}",
            path.display()
        );
    };
    Ok(base.with_env_overrides())
}

pub fn init_config(path: &Path, mut cfg: ClientConfig, timeout_secs: Option<u64>) -> Result<()> {
    if let Some(secs) = timeout_secs {
        cfg.timeout_secs = secs;
    }
    config::save_config_to(path, &cfg)?;
    println!("config written to {}", path.display());
    Ok(())
}

pub fn show_config(cfg: &ClientConfig) {
    println!("base_url:       {}", cfg.base_url);
    println!(
        "session_cookie: {}",
        cfg.session_cookie.as_deref().map(config::redact).unwrap_or_else(|| "-".to_string())
    );
    println!(
        "csrf_token:     {}",
        cfg.csrf_token.as_deref().map(config::redact).unwrap_or_else(|| "-".to_string())
    );
    println!("timeout_secs:   {}", cfg.timeout_secs);
}

/// Build a one-target page, click the requested button and wait for the
/// reply to be applied.
pub async fn vote(cfg: &ClientConfig, target: VoteTarget, role: ButtonRole, rating: i64) -> Result<()> {
    let page = Arc::new(Document::for_target(&target, rating));
    if let Some(token) = &cfg.csrf_token {
        page.set_cookie(&format!("{CSRF_COOKIE}={token}"));
    }

    let handler = VoteHandler::attach(Arc::clone(&page), Arc::new(HttpTransport::new(cfg)));
    let button = page
        .button(role, &target)
        .ok_or_else(|| eyre!("no {role:?} button for {target}"))?;

    let state = match handler.handle_click(ClickEvent::on(button)) {
        ClickOutcome::Dispatched(task) => task.await??,
        ClickOutcome::Aborted(e) => return Err(e.into()),
        ClickOutcome::Disabled | ClickOutcome::Ignored => bail!("{role:?} button for {target} is not clickable"),
    };

    let rating = page.text_of(&target.counter_id()).unwrap_or_default();
    println!("{target}: rating {rating}, {}", describe(state));
    Ok(())
}

fn describe(state: ButtonState) -> &'static str {
    match state {
        ButtonState::None => "no vote",
        ButtonState::Liked => "liked",
        ButtonState::Disliked => "disliked",
    }
}
