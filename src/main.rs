use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};

use jotinha::app::connect;
use jotinha::config::AppConfig;
use jotinha::domain::entities::edit::CardDraft;
use jotinha::error::{BoardError, ValidationError};
use jotinha::telemetry::init_tracing;
use jotinha::ui::render::{render_board, render_card};
use jotinha::ui::state::app_state::AppState;
use jotinha::usecase::services::access_gate::AccessGate;
use jotinha::usecase::services::import_service::ImportService;

#[derive(Parser)]
#[command(name = "jotinha")]
#[command(about = "Kanban board stored in a spreadsheet", long_about = None, version)]
struct Cli {
    /// Path to a TOML config file (defaults to JOTINHA_CONFIG or the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Board password; prompted for when omitted. The prompt echoes what is typed
    #[arg(long, global = true)]
    password: Option<String>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the board
    Show,

    /// Add, edit, view or delete cards
    Card {
        #[command(subcommand)]
        action: CardCommand,
    },

    /// Add, delete or reorder columns
    Column {
        #[command(subcommand)]
        action: ColumnCommand,
    },

    /// Replace board tabs with exported data
    Import {
        #[command(subcommand)]
        source: ImportCommand,
    },
}

#[derive(Subcommand)]
enum CardCommand {
    /// Show one card in full
    View { index: usize },

    /// Create a card at the end of the cards tab
    Add {
        #[arg(long)]
        column: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        content: String,
    },

    /// Change a card; fields left out keep their current value
    Edit {
        index: usize,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        column: Option<String>,
    },

    /// Delete a card (later cards move up one position)
    Delete { index: usize },
}

#[derive(Subcommand)]
enum ColumnCommand {
    Add { name: String },
    Delete { name: String },
    /// Rewrite the column order; every existing column must be listed once
    Reorder {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

#[derive(Subcommand)]
enum ImportCommand {
    /// Load both tabs from an .xlsx download of the spreadsheet
    Xlsx { path: PathBuf },
    /// Load one tab from a CSV file
    Csv {
        #[arg(long)]
        tab: String,
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_tracing(cli.verbose) {
        eprintln!("{err:#}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<BoardError>() {
            Some(board_err) if board_err.is_validation() => {
                eprintln!("warning: {board_err}");
                ExitCode::from(2)
            }
            _ => {
                eprintln!("error: {err:#}");
                ExitCode::FAILURE
            }
        },
    }
}

fn prompt_password() -> Result<String> {
    eprint!("Password: ");
    io::stderr().flush().context("failed to flush prompt")?;
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("failed to read password")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;

    let gate = AccessGate::new(
        config.password.clone(),
        Duration::minutes(config.session_ttl_minutes),
    );
    let attempt = match cli.password {
        Some(password) => password,
        None => prompt_password()?,
    };
    let session = gate.unlock(&attempt, Utc::now())?;

    let client = connect(&config)?;
    let layout = config.layout();

    if let Commands::Import { source } = &cli.command {
        let importer = ImportService::new(client.clone(), layout.clone());
        let results = match source {
            ImportCommand::Xlsx { path } => importer.import_xlsx(path)?,
            ImportCommand::Csv { tab, path } => vec![importer.import_csv(tab, path)?],
        };
        for result in results {
            eprintln!("Imported {} row(s) into '{}'", result.row_count, result.tab);
        }
    }

    let mut state = AppState::open(client, layout, session)?;

    let changed = match cli.command {
        Commands::Show | Commands::Import { .. } => false,
        Commands::Card { action } => match action {
            CardCommand::View { index } => {
                let card = state.board.card(index).ok_or(BoardError::Validation(
                    ValidationError::CardNotLoaded {
                        row_index: index,
                        loaded: state.board.cards.len(),
                    },
                ))?;
                print!("{}", render_card(card));
                return Ok(());
            }
            CardCommand::Add {
                column,
                title,
                content,
            } => {
                state.create_card(CardDraft::new(title, content, column))?;
                true
            }
            CardCommand::Edit {
                index,
                title,
                content,
                column,
            } => {
                let mut draft = state.board.card(index).map(CardDraft::from).ok_or(
                    BoardError::Validation(ValidationError::CardNotLoaded {
                        row_index: index,
                        loaded: state.board.cards.len(),
                    }),
                )?;
                if let Some(title) = title {
                    draft.title = title;
                }
                if let Some(content) = content {
                    draft.content = content;
                }
                if let Some(column) = column {
                    draft.column = column;
                }
                state.update_card(index, draft)?;
                true
            }
            CardCommand::Delete { index } => {
                state.delete_card(index)?;
                true
            }
        },
        Commands::Column { action } => {
            match action {
                ColumnCommand::Add { name } => state.create_column(&name)?,
                ColumnCommand::Delete { name } => state.delete_column(&name)?,
                ColumnCommand::Reorder { names } => state.reorder_columns(&names)?,
            }
            true
        }
    };

    if changed {
        eprintln!("{}", state.status);
    }
    print!("{}", render_board(&state.board));
    Ok(())
}
