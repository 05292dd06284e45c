mod cli;

use crate::cli::Cli;
use clap::Parser;
use futures::{StreamExt, pin_mut};
use miette::{IntoDiagnostic, WrapErr};
use shoebox_config::Config;
use shoebox_journal::{Database, Repository};
use shoebox_library::Context;
use shoebox_library::organize::{OrganizeEvent, Summary, organize};
use shoebox_storage::BackendHandle;
use shoebox_storage::backend::LocalBackend;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> miette::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = Config::load()
        .map_err(|e| miette::miette!("{e}"))
        .wrap_err("could not load configuration")?;
    cli.apply(&mut config);

    let Some(source) = config.source.clone() else {
        miette::bail!("no source directory given (use --source or the config file)");
    };
    let Some(target) = config.target.clone() else {
        miette::bail!("no target directory given (use --target or the config file)");
    };

    // An unreadable or missing source is fatal; nothing useful can happen.
    let source = std::fs::canonicalize(&source)
        .into_diagnostic()
        .wrap_err_with(|| format!("source directory is not accessible: {}", source.display()))?;
    if !source.is_dir() {
        miette::bail!("source is not a directory: {}", source.display());
    }
    // The target is created up front, which doubles as the writability check.
    std::fs::create_dir_all(&target)
        .into_diagnostic()
        .wrap_err_with(|| format!("target directory cannot be created: {}", target.display()))?;
    let target = std::fs::canonicalize(&target)
        .into_diagnostic()
        .wrap_err_with(|| format!("target directory is not accessible: {}", target.display()))?;

    // Losing the journal mid-run would forfeit idempotence, so failing to
    // open it at all is fatal too.
    let journal_path = config.journal_path().map_err(|e| miette::miette!("{e}"))?;
    if let Some(parent) = journal_path.parent() {
        std::fs::create_dir_all(parent)
            .into_diagnostic()
            .wrap_err_with(|| format!("journal directory cannot be created: {}", parent.display()))?;
    }
    let db = Database::connect(&journal_path)
        .await
        .map_err(|e| miette::miette!("{e}"))
        .wrap_err_with(|| format!("journal store is unavailable: {}", journal_path.display()))?;
    let journal = Repository::from(&db);

    // One backend rooted at the filesystem root addresses both trees, so a
    // move inside one filesystem stays a cheap rename.
    let backend: BackendHandle = Arc::new(LocalBackend::new("fs", "/").map_err(|e| miette::miette!("{e}"))?);
    let ctx = Context::new(rootless(&source)?, rootless(&target)?, config.mode, config.recursive);

    let summary = drive(&backend, &journal, &ctx).await?;
    db.close().await;

    tracing::info!(
        filed = summary.filed,
        unsorted = summary.unsorted,
        skipped = summary.skipped,
        failed = summary.failed,
        "Run complete"
    );
    Ok(match summary.fully_successful() {
        true => ExitCode::SUCCESS,
        false => ExitCode::FAILURE,
    })
}

/// Consume the organize stream, reporting each event on the console.
async fn drive(backend: &BackendHandle, journal: &Repository, ctx: &Context) -> miette::Result<Summary> {
    let stream = organize(backend, journal, ctx);
    pin_mut!(stream);
    let mut summary = Summary::default();
    while let Some(event) = stream.next().await {
        match event.map_err(|e| miette::miette!("{e}")).wrap_err("organizing halted")? {
            OrganizeEvent::Started => {
                tracing::info!(
                    source = %ctx.source_root.display(),
                    target = %ctx.target_root.display(),
                    mode = %ctx.mode,
                    "Organizing"
                );
            },
            OrganizeEvent::DiscoveryComplete(total) => {
                tracing::info!(files = total, "Source listing complete");
            },
            OrganizeEvent::Organized(action) => report(&action),
            OrganizeEvent::TransferFailed { path, reason } => {
                tracing::error!(path = %path.display(), reason = %reason, "Transfer failed; file left in place");
            },
            OrganizeEvent::Complete(totals) => summary = totals,
        }
    }
    Ok(summary)
}

fn report(action: &shoebox_library::organize::Action) {
    use shoebox_library::organize::Action;
    match action {
        Action::Filed { source, destination, detection } => {
            tracing::info!(
                from = %source.display(),
                to = %destination.display(),
                date = %detection.date,
                via = %detection.source,
                "Filed"
            );
        },
        Action::Unsorted { source, destination } => {
            tracing::warn!(
                from = %source.display(),
                to = %destination.display(),
                "No capture date; parked in unsorted"
            );
        },
        Action::AlreadySeen(path) => {
            tracing::debug!(path = %path.display(), "Already journaled; skipping");
        },
    }
}

/// Convert an absolute path into one relative to the `/`-rooted backend.
fn rootless(path: &Path) -> miette::Result<PathBuf> {
    Ok(path
        .strip_prefix("/")
        .into_diagnostic()
        .wrap_err_with(|| format!("expected an absolute path: {}", path.display()))?
        .to_path_buf())
}
