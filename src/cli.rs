//! Non-interactive commands.
//!
//! `list`, `clone`, `update`, and `remove` reuse the same scanner, tree,
//! and batch coordinator as the interactive mode and print per-target
//! outcomes as they arrive, followed by the summary line. `init` writes
//! the configuration file.

use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::batch::Coordinator;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::git::Git;
use crate::models::{BatchEvent, BatchSummary, OpKind};
use crate::remote;
use crate::scanner::Scanner;

pub struct Runner {
    git: Arc<Git>,
    coordinator: Coordinator<Git>,
    scanner: Scanner,
}

impl Runner {
    pub fn new(config: &Config) -> Result<Self> {
        if !config.is_configured() {
            return Err(AppError::Config(
                "no codebases path configured; run `grove init <path>` first".to_string(),
            ));
        }
        let git = Arc::new(Git::new(&config.codebases_path));
        Ok(Self {
            coordinator: Coordinator::new(Arc::clone(&git)),
            git,
            scanner: Scanner::new(&config.codebases_path),
        })
    }

    /// Print every discovered entry, one per line, sorted by path.
    pub fn list(&self) -> Result<()> {
        let mut entries = self.scanner.scan()?;
        if entries.is_empty() {
            println!("No repositories found.");
            return Ok(());
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        for entry in entries {
            println!("{}", entry.name);
        }
        Ok(())
    }

    /// Clone one or more URLs. Validation happens up front so a typo in
    /// any URL stops the whole invocation before git runs.
    pub async fn clone(&self, urls: Vec<String>) -> Result<()> {
        if urls.is_empty() {
            return Err(AppError::InvalidUrl("no URLs provided".to_string()));
        }
        for url in &urls {
            remote::validate_url(url)?;
        }

        if let [url] = urls.as_slice() {
            println!("Cloning {} into {}...", url, remote::clone_path(url));
            let result = self.coordinator.run_single(OpKind::Clone, url.clone()).await;
            if !result.success {
                return Err(AppError::Executor(result.message));
            }
            println!("Clone completed successfully.");
            return Ok(());
        }

        self.run_batch(OpKind::Clone, urls).await
    }

    /// Update repositories by name.
    pub async fn update(&self, names: Vec<String>) -> Result<()> {
        if names.is_empty() {
            return Err(AppError::InvalidTarget("no repositories specified".to_string()));
        }
        for name in &names {
            if !self.git.is_repository(name) {
                return Err(AppError::InvalidTarget(name.clone()));
            }
        }

        if let [name] = names.as_slice() {
            println!("Updating {}...", name);
            let result = self.coordinator.run_single(OpKind::Update, name.clone()).await;
            if !result.success {
                return Err(AppError::Executor(result.message));
            }
            println!("Update completed successfully.");
            return Ok(());
        }

        self.run_batch(OpKind::Update, names).await
    }

    /// Remove repositories by name, prompting unless `force` is set.
    /// Existence of every target is checked before anything is deleted.
    pub async fn remove(&self, names: Vec<String>, force: bool) -> Result<()> {
        if names.is_empty() {
            return Err(AppError::InvalidTarget("no repositories specified".to_string()));
        }
        for name in &names {
            if !self.git.path_exists(name) {
                return Err(AppError::NotFound(name.clone()));
            }
        }

        if !force {
            println!("About to remove:");
            for name in &names {
                println!("  - {}", name);
            }
            print!("\nThis action cannot be undone. Continue? [y/N] ");
            std::io::stdout().flush()?;

            let mut input = String::new();
            std::io::stdin().lock().read_line(&mut input)?;
            if input.trim().to_lowercase() != "y" {
                println!("Remove cancelled.");
                return Ok(());
            }
        }

        self.run_batch(OpKind::Remove, names).await
    }

    /// Stream a batch to stdout and fail the invocation when any target
    /// failed.
    async fn run_batch(&self, kind: OpKind, targets: Vec<String>) -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        self.coordinator.start(kind, targets, tx)?;

        let mut summary: Option<BatchSummary> = None;
        while let Some(event) = rx.recv().await {
            match event {
                BatchEvent::TargetPending { .. } => {}
                BatchEvent::TargetDone { result } => {
                    if result.success {
                        println!("✓ {}: {}", result.target, result.message);
                    } else {
                        println!("✗ {}: {}", result.target, result.message);
                    }
                }
                BatchEvent::BatchFinished { summary: s } => {
                    summary = Some(s);
                    break;
                }
            }
        }

        let summary = summary
            .ok_or_else(|| AppError::Executor("batch ended without a summary".to_string()))?;
        println!("Summary: {} succeeded, {} failed", summary.succeeded, summary.failed);

        if summary.failed > 0 {
            return Err(AppError::Executor(format!(
                "{} operations failed",
                summary.failed
            )));
        }
        Ok(())
    }
}

/// Create the configuration file pointing at `path`, creating the
/// directory when needed.
pub fn init(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    let canonical = std::fs::canonicalize(path)?;

    let config = Config {
        codebases_path: canonical.to_string_lossy().to_string(),
        config_path: None,
    };
    config.save()?;

    println!("Codebases path set to {}", canonical.display());
    Ok(())
}
