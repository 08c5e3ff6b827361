//! Schema maintenance entry point.
//!
//! # Responsibility
//! - Create, drop, or recreate every mapped table from the command line.
//! - Keep behavior deterministic: one mode argument, exit code reflects
//!   the outcome.

use std::process::ExitCode;

use pongstore_core::{all_declarations, ConnectionFactory, SchemaManager};

fn main() -> ExitCode {
    let mode = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "recreate".to_string());

    let factory = ConnectionFactory::from_env();
    let manager = SchemaManager::new(&factory);
    let entities = all_declarations();

    let result = match mode.as_str() {
        "create" => manager.create_all(&entities),
        "drop" => manager.drop_all(&entities),
        "recreate" => manager.recreate_all(&entities),
        other => {
            eprintln!("unknown mode `{other}`; expected create|drop|recreate");
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => {
            println!(
                "schema {mode} finished for {} tables in {}",
                entities.len(),
                factory.path().display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("schema {mode} failed: {err}");
            ExitCode::FAILURE
        }
    }
}
