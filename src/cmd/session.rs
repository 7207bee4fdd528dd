//! Terminal client commands: `start`, `status`, `note`, `evaluate`, `hint`, `end`.
//!
//! Every command reconciles the local session cache with the server before
//! acting, and checks the phase gate locally so locked sections are refused
//! without a round trip.

use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use console::style;

use interview_companion::client::cache::{CachedSession, SessionCache};
use interview_companion::client::{ApiClient, ClientError};
use interview_companion::config::AppConfig;
use interview_companion::phase::{self, NoteSection};
use interview_companion::session::SessionSnapshot;
use interview_companion::ui::{self, icons::CHECK};

struct ClientContext {
    client: ApiClient,
    cache: SessionCache,
}

impl ClientContext {
    fn new(project_dir: &Path, config: &AppConfig) -> Result<Self> {
        Ok(Self {
            client: ApiClient::new(&config.client.server_url)?,
            cache: SessionCache::new(project_dir),
        })
    }

    /// The live session, or an error telling the user to start one.
    async fn active(&self) -> Result<(CachedSession, SessionSnapshot)> {
        match self.cache.resume(&self.client).await? {
            Some(active) => Ok(active),
            None => bail!("No active session. Run `interview-companion start` first."),
        }
    }

    /// Drop the cache when the server has forgotten the session.
    fn forget_if_gone(&self, err: ClientError) -> anyhow::Error {
        if let ClientError::SessionGone(_) = &err
            && let Err(e) = self.cache.clear()
        {
            return e;
        }
        err.into()
    }
}

fn parse_section(raw: &str) -> Result<NoteSection> {
    NoteSection::from_str(raw).map_err(anyhow::Error::msg)
}

fn ensure_accessible(snapshot: &SessionSnapshot, section: NoteSection) -> Result<()> {
    if phase::is_section_accessible(&snapshot.notes, section) {
        return Ok(());
    }
    let current = snapshot.phase_status.current_phase;
    let blocking = NoteSection::from_phase_index(current)
        .map(|s| s.label())
        .unwrap_or("the previous phase");
    bail!(
        "{} is locked. Complete {} (phase {}) first.",
        section.label(),
        blocking,
        current
    )
}

pub async fn cmd_start(project_dir: &Path, config: &AppConfig, force: bool) -> Result<()> {
    let ctx = ClientContext::new(project_dir, config)?;

    if let Some((cached, _)) = ctx.cache.resume(&ctx.client).await? {
        if !force {
            println!("A session is already in progress:");
            println!();
            println!("{}", ui::render_question(&cached.question));
            println!();
            println!("Run `interview-companion end` or `start --force` to begin a new one.");
            return Ok(());
        }
        match ctx.client.end(&cached.session_id).await {
            Ok(()) | Err(ClientError::SessionGone(_)) => {}
            Err(e) => return Err(e.into()),
        }
        ctx.cache.clear()?;
    }

    let started = ctx.client.start().await?;
    ctx.cache
        .save(&CachedSession::from_started(&started, ctx.client.base_url()))?;

    println!("{}", ui::render_question(&started.question));
    println!();
    println!(
        "Begin with {} (always open), then {}.",
        style(NoteSection::ResourceEstimation.label()).bold(),
        style(NoteSection::Assumptions.label()).bold()
    );
    println!(
        "{}",
        style("Write notes with `interview-companion note <section> \"...\"`.").dim()
    );
    Ok(())
}

pub async fn cmd_status(project_dir: &Path, config: &AppConfig) -> Result<()> {
    let ctx = ClientContext::new(project_dir, config)?;
    match ctx.cache.resume(&ctx.client).await? {
        Some((_, snapshot)) => println!("{}", ui::render_snapshot(&snapshot)),
        None => println!("No active session. Run `interview-companion start` to begin."),
    }
    Ok(())
}

fn read_note(text: Option<&str>, file: Option<&Path>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text.to_string());
    }
    if let Some(path) = file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read note from stdin")?;
    Ok(buf)
}

pub async fn cmd_note(
    project_dir: &Path,
    config: &AppConfig,
    section: &str,
    text: Option<&str>,
    file: Option<&Path>,
) -> Result<()> {
    let section = parse_section(section)?;
    let content = read_note(text, file)?;

    let ctx = ClientContext::new(project_dir, config)?;
    let (cached, snapshot) = ctx.active().await?;
    ensure_accessible(&snapshot, section)?;

    let updated = ctx
        .client
        .update_note(&cached.session_id, section, &content)
        .await
        .map_err(|e| ctx.forget_if_gone(e))?;

    println!("{}Saved {}", CHECK, style(section.label()).bold());
    println!();
    println!("{}", ui::render_phase_status(&updated.phase_status));
    Ok(())
}

pub async fn cmd_evaluate(project_dir: &Path, config: &AppConfig, section: &str) -> Result<()> {
    let section = parse_section(section)?;

    let ctx = ClientContext::new(project_dir, config)?;
    let (cached, snapshot) = ctx.active().await?;
    ensure_accessible(&snapshot, section)?;

    let content = snapshot.notes.get(section).trim();
    if content.is_empty() {
        bail!(
            "No notes for {} yet. Add them with `interview-companion note {} \"...\"`.",
            section.label(),
            section.as_str()
        );
    }

    let spinner = ui::spinner(&format!("Evaluating {}...", section.label()));
    let result = ctx
        .client
        .evaluate(&cached.session_id, section, content)
        .await;
    spinner.finish_and_clear();

    let outcome = result.map_err(|e| ctx.forget_if_gone(e))?;
    println!("{}", ui::render_evaluation(&outcome.evaluation));
    Ok(())
}

pub async fn cmd_hint(project_dir: &Path, config: &AppConfig, section: &str) -> Result<()> {
    let section = parse_section(section)?;

    let ctx = ClientContext::new(project_dir, config)?;
    let (cached, snapshot) = ctx.active().await?;
    ensure_accessible(&snapshot, section)?;

    let spinner = ui::spinner("Thinking of a hint...");
    let result = ctx.client.hint(&cached.session_id, section).await;
    spinner.finish_and_clear();

    let hint = result.map_err(|e| ctx.forget_if_gone(e))?;
    println!("{}", ui::render_hint(section, &hint));
    Ok(())
}

pub async fn cmd_end(project_dir: &Path, config: &AppConfig, yes: bool) -> Result<()> {
    use dialoguer::Confirm;

    let ctx = ClientContext::new(project_dir, config)?;
    let Some(cached) = ctx.cache.load()? else {
        println!("No active session.");
        return Ok(());
    };

    if !yes {
        let confirm = Confirm::new()
            .with_prompt("End this session? Notes and evaluations will be discarded.")
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirm {
            println!("End cancelled");
            return Ok(());
        }
    }

    match ctx.client.end(&cached.session_id).await {
        Ok(()) => println!("Session ended"),
        Err(ClientError::SessionGone(_)) => println!("Session had already ended on the server"),
        Err(e) => return Err(e.into()),
    }
    ctx.cache.clear()?;
    Ok(())
}
