//! # Modeler CLI Module
//!
//! The command-line front-end. It plays the part of the UI layer: each
//! command dispatches an action on a store module and renders the resulting
//! cache.
//!
//! ## Available Commands
//!
//! - `objects` - List, show, create, update and delete objects
//! - `fields` - Manage the fields of an object
//! - `records` - Manage the records of an object
//! - `open` - Navigate to a route and show its page
//! - `route` - Resolve a path against the route table
//! - `sanitize` - Turn free text into an identifier
//! - `config` - Show the effective configuration

mod commands;

use crate::AppError;
use crate::bootstrap::App;
use crate::config::AppConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Modeler - manage objects, fields and records of a low-code backend.
#[derive(Parser, Debug)]
#[command(name = "modeler")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL (overrides config file and environment)
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage objects
    Objects {
        #[command(subcommand)]
        action: ObjectAction,
    },

    /// Manage the fields of an object
    Fields {
        /// Owning object uuid
        #[arg(short, long)]
        object: String,

        #[command(subcommand)]
        action: ChildAction,
    },

    /// Manage the records of an object
    Records {
        /// Owning object uuid
        #[arg(short, long)]
        object: String,

        #[command(subcommand)]
        action: ChildAction,
    },

    /// Navigate to a route and show its page
    Open {
        /// Path, e.g. /objects or /objects/<uuid>
        #[arg(default_value = "/")]
        path: String,
    },

    /// Resolve a path against the route table
    Route {
        /// Path to resolve
        path: String,
    },

    /// Turn free text into an identifier
    Sanitize {
        /// Raw text
        text: String,
    },

    /// Show the effective configuration
    Config,
}

/// Object actions.
#[derive(Subcommand, Debug)]
pub enum ObjectAction {
    /// List all objects
    List,

    /// Fetch one object
    Get {
        /// Object uuid
        uuid: String,
    },

    /// Create an object
    Create {
        /// Name, sanitized into an identifier and sent as `name`
        #[arg(short, long)]
        name: Option<String>,

        /// JSON object payload
        #[arg(short, long)]
        data: Option<String>,
    },

    /// Update an object
    Update {
        /// Object uuid
        uuid: String,

        /// Name, sanitized into an identifier and sent as `name`
        #[arg(short, long)]
        name: Option<String>,

        /// JSON object payload
        #[arg(short, long)]
        data: Option<String>,
    },

    /// Delete an object
    Delete {
        /// Object uuid
        uuid: String,
    },
}

/// Field and record actions.
#[derive(Subcommand, Debug)]
pub enum ChildAction {
    /// List the collection
    List,

    /// Create an entry
    Create {
        /// Name, sanitized into an identifier and sent as `name`
        #[arg(short, long)]
        name: Option<String>,

        /// JSON object payload
        #[arg(short, long)]
        data: Option<String>,
    },

    /// Update an entry
    Update {
        /// Entry uuid
        id: String,

        /// Name, sanitized into an identifier and sent as `name`
        #[arg(short, long)]
        name: Option<String>,

        /// JSON object payload
        #[arg(short, long)]
        data: Option<String>,
    },

    /// Delete an entry
    Delete {
        /// Entry uuid
        id: String,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Load configuration with the CLI's own overrides applied.
pub fn load_config(cli: &Cli) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(base) = &cli.api_base {
        config.api.base_url = base.clone();
        config.validate()?;
    }
    Ok(config)
}

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), AppError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Sanitize { ref text }) => return cmd_sanitize(text, json_mode),
        Some(Commands::Route { ref path }) => return cmd_route(path, json_mode),
        _ => {}
    }

    let config = load_config(&cli)?;
    let app = App::bootstrap(config)?;

    match cli.command {
        Some(Commands::Objects { action }) => cmd_objects(&app, action, json_mode).await,
        Some(Commands::Fields { object, action }) => {
            cmd_fields(&app, &object, action, json_mode).await
        }
        Some(Commands::Records { object, action }) => {
            cmd_records(&app, &object, action, json_mode).await
        }
        Some(Commands::Open { path }) => cmd_open(&app, &path, json_mode).await,
        Some(Commands::Config) => cmd_config(&app),
        Some(Commands::Sanitize { .. }) | Some(Commands::Route { .. }) => Ok(()),
        None => {
            // No subcommand - open the object list by default
            cmd_open(&app, "/objects", json_mode).await
        }
    }
}
