use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;
use bookbot_core::catalog::Catalog;
use bookbot_core::config::{AppConfig, LoadOptions};
use bookbot_fulfillment::{wire, DispatchContext, FulfillmentService};
use serde_json::json;

use crate::commands::{CommandResult, EXIT_CATALOG, EXIT_CONFIG, EXIT_INPUT};

/// Runs one webhook request body through the dispatcher without a server.
/// Reads stdin when no input file is given.
pub fn run(input: Option<&Path>, catalog_path: Option<&Path>) -> CommandResult {
    match read_input(input) {
        Ok(body) => run_body(&body, catalog_path),
        Err(error) => CommandResult::failure("fulfill", "input_unreadable", format!("{error:#}"), EXIT_INPUT),
    }
}

pub fn run_body(body: &str, catalog_path: Option<&Path>) -> CommandResult {
    let catalog_path = match catalog_path {
        Some(path) => Some(path.to_path_buf()),
        None => match AppConfig::load(LoadOptions::default()) {
            Ok(config) => config.catalog.path,
            Err(error) => {
                return CommandResult::failure("fulfill", "config_validation", error.to_string(), EXIT_CONFIG);
            }
        },
    };

    let catalog = match Catalog::load(catalog_path.as_deref()) {
        Ok(catalog) => Arc::new(catalog),
        Err(error) => {
            return CommandResult::failure("fulfill", "catalog_invalid", error.to_string(), EXIT_CATALOG);
        }
    };

    let request = match wire::decode(body.as_bytes()) {
        Ok(request) => request,
        Err(error) => {
            return CommandResult::failure("fulfill", "malformed_request", error.to_string(), EXIT_INPUT);
        }
    };

    let service = FulfillmentService::with_catalog(catalog);
    let ctx = DispatchContext {
        correlation_id: request.response_id.clone().unwrap_or_else(|| "cli".to_string()),
    };

    match service.fulfill(&request, &ctx) {
        Ok(fulfilled) => CommandResult::success_with(
            "fulfill",
            format!("{} handled", fulfilled.outcome.intent),
            Some(json!({
                "intent": fulfilled.outcome.intent.as_str(),
                "flow_state": fulfilled.outcome.state.label(),
                "response": fulfilled.webhook,
            })),
        ),
        Err(error) => CommandResult::success_with(
            "fulfill",
            format!("{error}; answered with the generic fallback"),
            Some(json!({
                "intent": request.intent,
                "flow_state": null,
                "response": FulfillmentService::unhandled(),
            })),
        ),
    }
}

fn read_input(input: Option<&Path>) -> anyhow::Result<String> {
    match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("could not read request body from `{}`", path.display())),
        None => {
            let mut body = String::new();
            io::stdin().read_to_string(&mut body).context("could not read request body from stdin")?;
            Ok(body)
        }
    }
}
