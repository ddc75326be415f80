// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

mod cli;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = praxis_config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Validate { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let analyzed = praxis_dsl::analyze_dsl(&text, praxis_types::ParamStore::new())
                .with_context(|| format!("validating {}", file.display()))?;
            println!("ok: {} node(s)", analyzed.nodes.len());
            Ok(())
        }
        Commands::Run { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let tools = praxis_tools::ToolRegistry::with_builtins();
            let facade = praxis_agent::AgentFacade::new(&config, tools);
            let result = facade
                .submit_dsl(&text)
                .await
                .with_context(|| format!("running {}", file.display()))?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Commands::Serve => {
            let tools = praxis_tools::ToolRegistry::with_builtins();
            let facade = praxis_agent::AgentFacade::new(&config, tools);
            let handle = facade
                .start_p2p(&config)
                .context("starting p2p node")?;
            println!("listening as peer {}", handle.local_peer_id());
            tokio::signal::ctrl_c().await.context("waiting for ctrl-c")?;
            Ok(())
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}
