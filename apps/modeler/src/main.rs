//! # Modeler - command-line client
//!
//! ## Usage
//!
//! ```bash
//! # Browse
//! modeler open /objects
//! modeler open /objects/<uuid>
//!
//! # Mutate
//! modeler objects create --name "Customer Order"
//! modeler fields --object <uuid> create --name "Due Date" --data '{"type":"date"}'
//! modeler records --object <uuid> delete <record-uuid>
//!
//! # Offline helpers
//! modeler sanitize "Hello World!"
//! modeler route /objects/abc
//! ```

use clap::Parser;
use modeler::{bootstrap, cli};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    bootstrap::init_tracing(cli.verbose);

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}
