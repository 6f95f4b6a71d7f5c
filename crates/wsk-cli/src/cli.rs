//! CLI definition and command dispatch for WSK.
//!
//! This module defines the command-line interface using `clap` and provides
//! the `run()` function that dispatches commands to the workspace store.
//!
//! ## Configuration Precedence
//!
//! Configuration is resolved with the following precedence (highest to lowest):
//! 1. CLI flags (e.g., `--config`, `--workspace`, `--verbose`)
//! 2. Environment variables (`WSK_CONFIG`, `WSK_WORKSPACE`, `WSK_VERBOSE`)
//! 3. Config file (`~/.wsk/config.yaml` or path from `--config`/`WSK_CONFIG`)
//! 4. Built-in defaults (workspace directory `./workspace`)

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};

use crate::ui::{format, ColorMode, MessageType, Progress, ProgressMode, Style};

use wsk_core::{
    count_nodes, FileNode, FileNodeKind, GlobalConfig, LogKind, RepoUrl, TerminalSession,
    WorkspaceStore, WskError,
};

// ============================================================================
// CLI Definition
// ============================================================================

/// Version string including git commit hash
const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

/// Workspace Sandbox Kit – sandboxed workspace and command execution
#[derive(Parser, Debug)]
#[command(name = "wsk")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, env = "WSK_VERBOSE")]
    pub verbose: bool,

    /// Suppress progress and informational messages
    #[arg(short, long, global = true, env = "WSK_QUIET")]
    pub quiet: bool,

    /// Path to configuration file (default: ~/.wsk/config.yaml)
    #[arg(long, global = true, env = "WSK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Workspace directory (default: from config, else ./workspace)
    #[arg(short = 'w', long, global = true, env = "WSK_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Color output mode: always, never, or auto (default: auto)
    #[arg(long, global = true, env = "WSK_COLOR", default_value = "auto")]
    pub color: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replace the workspace with a fresh clone of a repository
    #[command(after_help = r#"EXAMPLES:
    # Clone a repository into the workspace
    wsk clone https://github.com/acme/site.git

    # Get the resulting file tree as JSON for scripting
    wsk clone https://github.com/acme/site.git --json

    # Clone into a custom workspace directory
    wsk --workspace /tmp/sandbox clone https://github.com/acme/site.git
"#)]
    Clone {
        /// Repository URL to clone (https, ssh, or local path)
        repo_url: String,

        /// Output the resulting file tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the workspace file tree
    #[command(after_help = r#"EXAMPLES:
    # Show the tree as indented text
    wsk tree

    # Get the tree as JSON and pick file paths out of it
    wsk tree --json | jq '..|.path? // empty'
"#)]
    Tree {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print the contents of a workspace file
    #[command(after_help = r#"EXAMPLES:
    # Print a file (paths are workspace-relative)
    wsk cat src/main.js

    # Leading slashes are accepted too
    wsk cat /src/main.js
"#)]
    Cat {
        /// Workspace-relative path of the file
        path: String,
    },

    /// Create or overwrite a workspace file
    // `##` delimiters: the example text itself contains `"#`
    #[command(after_help = r##"EXAMPLES:
    # Write inline text
    wsk write notes.md --text "# Notes"

    # Write from stdin
    cat local.js | wsk write src/main.js
"##)]
    Write {
        /// Workspace-relative path of the file
        path: String,

        /// File content; read from stdin when omitted
        #[arg(long)]
        text: Option<String>,
    },

    /// Stage all changes and commit them
    #[command(after_help = r#"EXAMPLES:
    # Commit everything that changed
    wsk commit -m "fix bug"

    # A clean tree is not an error; git's answer is printed instead
    wsk commit -m "no-op" && echo "still exit 0"
"#)]
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: String,
    },

    /// Open the integrated terminal (or run a single line with -c)
    #[command(after_help = r#"EXAMPLES:
    # Interactive terminal (exit with `exit` or Ctrl-D)
    wsk term

    # Run one line and print its log entries
    wsk term -c "git status"

    # Commit through the terminal syntax
    wsk term -c 'git commit -m "fix bug"'
"#)]
    Term {
        /// Run a single line instead of reading from stdin
        #[arg(short = 'c', long = "command")]
        line: Option<String>,
    },

    /// Show workspace status
    #[command(after_help = r#"EXAMPLES:
    # Human-readable status
    wsk status

    # JSON for scripting
    wsk status --json | jq '.hasRepository'
"#)]
    Status {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

// ============================================================================
// Entry point
// ============================================================================

/// Parse arguments, set up logging and configuration, and dispatch.
///
/// Returns `ExitCode::SUCCESS` on success, or `ExitCode::FAILURE` on error.
pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    // - Always show warnings (for config issues, deprecations, etc.)
    // - Show debug info only when --verbose is set
    let log_level = if cli.verbose { "debug" } else { "warn" };
    let filter = format!("wsk_core={},wsk_cli={}", log_level, log_level);

    tracing_subscriber::fmt()
        .with_env_filter(&filter)
        .with_target(false)
        .init();

    // Parse color mode from --color flag
    let color_mode = ColorMode::from_str(&cli.color).unwrap_or(ColorMode::Auto);
    let style = Style::new(color_mode);

    // Load configuration
    // Priority: --config flag > WSK_CONFIG env > ~/.wsk/config.yaml
    let config = match &cli.config {
        Some(config_path) => GlobalConfig::from_path(config_path),
        None => GlobalConfig::load_default(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            let hint = match &cli.config {
                Some(path) => format!("Check your config at {}", path.display()),
                None => "Check your global config at ~/.wsk/config.yaml".to_string(),
            };
            eprintln!(
                "{}",
                style.error_with_context(
                    "Failed to load configuration",
                    Some(&e.to_string()),
                    Some(&hint),
                )
            );
            return ExitCode::FAILURE;
        }
    };

    for warning in config.validate() {
        tracing::warn!("{warning}");
    }

    // Resolve the workspace directory
    // Priority: --workspace flag > WSK_WORKSPACE env > config > ./workspace
    let workspace_dir = cli
        .workspace
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.workspace.dir));

    let store = match WorkspaceStore::open(&workspace_dir, &config) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            eprintln!(
                "{}",
                style.error_with_context(
                    &format!("Failed to open workspace at {}", workspace_dir.display()),
                    Some(&e.to_string()),
                    Some("Pass --workspace to pick a different directory"),
                )
            );
            return ExitCode::FAILURE;
        }
    };

    // Dispatch to command handler
    let result = match cli.command {
        Command::Clone { repo_url, json } => {
            handle_clone(&style, &store, repo_url, cli.quiet, json).await
        }
        Command::Tree { json } => handle_tree(&style, &store, json).await,
        Command::Cat { path } => handle_cat(&store, path).await,
        Command::Write { path, text } => handle_write(&style, &store, path, text).await,
        Command::Commit { message } => handle_commit(&style, &store, message, cli.quiet).await,
        Command::Term { line } => handle_term(Arc::clone(&store), line).await,
        Command::Status { json } => handle_status(&style, &store, json).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", style.message(MessageType::Err, &e.to_string()));
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// Command handlers
// ============================================================================

async fn handle_clone(
    style: &Style,
    store: &WorkspaceStore,
    repo_url: String,
    quiet: bool,
    json: bool,
) -> Result<(), WskError> {
    let url = RepoUrl::try_new(repo_url)?;

    // Clone is replace-all; say so when something is about to be discarded
    let before = store.status().await?;
    if before.file_count + before.folder_count > 0 && !json {
        eprintln!(
            "{}",
            style.message(
                MessageType::Warn,
                "Replacing existing workspace contents (unsaved edits are discarded)",
            )
        );
    }

    let mode = ProgressMode::detect(quiet, json, style.color_mode());
    let progress = Progress::spinner("Cloning repository...", mode);
    let result = store.clone_repo(&url).await;
    progress.finish_clear();
    let tree = result?;

    if json {
        let payload = serde_json::json!({ "fileTree": tree });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let (files, folders) = count_nodes(&tree);
    println!(
        "{}",
        style.message(
            MessageType::Ok,
            &format!(
                "Cloned {} into {}",
                url,
                store.workspace().root().display()
            )
        )
    );
    println!("{}", style.message_detail("Files", &files.to_string()));
    println!("{}", style.message_detail("Folders", &folders.to_string()));

    if !quiet {
        println!(
            "{}",
            style.message(MessageType::Hint, "Run `wsk tree` to inspect the file tree")
        );
    }
    Ok(())
}

async fn handle_tree(style: &Style, store: &WorkspaceStore, json: bool) -> Result<(), WskError> {
    let tree = store.snapshot_tree().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
        return Ok(());
    }

    if tree.is_empty() {
        println!(
            "{}",
            style.message(MessageType::Info, "Workspace is empty; run `wsk clone` first")
        );
        return Ok(());
    }

    print_tree(style, &tree, 0);
    Ok(())
}

async fn handle_cat(store: &WorkspaceStore, path: String) -> Result<(), WskError> {
    let content = store.read_file(&path).await?;

    // Verbatim output, no styling: this is the scriptable read path
    use std::io::Write;
    let mut stdout = std::io::stdout();
    stdout.write_all(content.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

async fn handle_write(
    style: &Style,
    store: &WorkspaceStore,
    path: String,
    text: Option<String>,
) -> Result<(), WskError> {
    let content = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };

    store.write_file(&path, &content).await?;
    println!(
        "{}",
        style.message(
            MessageType::Ok,
            &format!("Wrote {} ({} bytes)", style.file_path(&path), content.len())
        )
    );
    Ok(())
}

async fn handle_commit(
    style: &Style,
    store: &WorkspaceStore,
    message: String,
    quiet: bool,
) -> Result<(), WskError> {
    let mode = ProgressMode::detect(quiet, false, style.color_mode());
    let progress = Progress::spinner("Committing changes...", mode);
    let result = store.commit(&message).await;
    progress.finish_clear();
    let result = result?;

    // "Nothing to commit" and friends exit 0; the tool's answer is the result
    if result.succeeded {
        println!(
            "{}",
            style.message(MessageType::Ok, "Committed staged changes")
        );
    } else {
        println!(
            "{}",
            style.message(MessageType::Warn, "Commit did not create a revision")
        );
    }
    if !result.text.is_empty() {
        println!("{}", result.text);
    }
    Ok(())
}

async fn handle_status(style: &Style, store: &WorkspaceStore, json: bool) -> Result<(), WskError> {
    let status = store.status().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", style.section("WORKSPACE"));
    println!(
        "{}",
        style.key_value("Root", &status.workspace_root.display().to_string())
    );
    println!(
        "{}",
        style.key_value(
            "Repository",
            if status.has_repository { "yes" } else { "no" }
        )
    );
    println!("{}", style.key_value("Files", &status.file_count.to_string()));
    println!(
        "{}",
        style.key_value("Folders", &status.folder_count.to_string())
    );
    if let Some(ts) = status.modified_at {
        println!(
            "{}",
            style.key_value("Modified", &format::format_relative_time(ts))
        );
    }
    Ok(())
}

// ============================================================================
// Terminal
// ============================================================================

async fn handle_term(store: Arc<WorkspaceStore>, line: Option<String>) -> Result<(), WskError> {
    // One-shot mode: run the line, print every entry (echoes included, in
    // their `$ `-prefixed form), drain deferred results, done.
    if let Some(line) = line {
        let mut session = TerminalSession::new(store);
        for entry in session.submit(&line).await {
            println!("{entry}");
        }
        for entry in session.wait_idle().await {
            println!("{entry}");
        }
        return Ok(());
    }

    let interactive = atty::is(atty::Stream::Stdin);
    let mut session = TerminalSession::new(store);

    for entry in session.log() {
        println!("{entry}");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if interactive {
            print_prompt(session.pending_count())?;
        }

        tokio::select! {
            read = lines.next_line() => {
                let line = match read {
                    Ok(Some(line)) => line.trim().to_string(),
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!("terminal input closed: {e}");
                        break;
                    }
                };

                if line.is_empty() {
                    continue;
                }
                if line == "exit" {
                    break;
                }

                let appended = session.submit(&line).await;
                if appended.is_empty() && session.log().is_empty() {
                    // The line was `clear`
                    if interactive {
                        clear_screen()?;
                    }
                    continue;
                }
                for entry in &appended {
                    render_entry(entry, interactive);
                }
            }
            Some(entry) = session.next_completed(), if session.pending_count() > 0 => {
                println!("{}", entry.text);
            }
        }
    }

    // A commit may still be in flight when the user leaves
    for entry in session.wait_idle().await {
        println!("{}", entry.text);
    }
    Ok(())
}

/// Print one log entry. Interactive terminals already show what the user
/// typed, so command echoes are only printed for piped input.
fn render_entry(entry: &wsk_core::LogEntry, interactive: bool) {
    match entry.kind {
        LogKind::Command => {
            if !interactive {
                println!("{entry}");
            }
        }
        LogKind::Output => println!("{}", entry.text),
    }
}

fn print_prompt(pending: usize) -> std::io::Result<()> {
    use std::io::Write;
    let mut stdout = std::io::stdout();
    if pending > 0 {
        write!(stdout, "[{pending} pending] $ ")?;
    } else {
        write!(stdout, "$ ")?;
    }
    stdout.flush()
}

fn clear_screen() -> std::io::Result<()> {
    use std::io::Write;
    let mut stdout = std::io::stdout();
    write!(stdout, "\x1b[2J\x1b[H")?;
    stdout.flush()
}

// ============================================================================
// Rendering helpers
// ============================================================================

/// Render a file tree as indented text, folders first-class with a `/`.
fn print_tree(style: &Style, nodes: &[FileNode], depth: usize) {
    for node in nodes {
        let indent = "  ".repeat(depth);
        match node.kind {
            FileNodeKind::Folder => {
                println!("{}{}/", indent, node.name);
                if let Some(children) = &node.children {
                    print_tree(style, children, depth + 1);
                }
            }
            FileNodeKind::File => {
                println!("{}{}", indent, style.file_path(&node.name));
            }
        }
    }
}
