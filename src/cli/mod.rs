pub mod commands;
pub mod utils;

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::gateway::{Gateway, HttpGateway, Session};

#[derive(Parser)]
#[command(name = "fleet")]
#[command(about = "Fleet CLI - operator diagnostics against the hosted backend")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Transaction table diagnostics")]
    Transactions {
        #[command(subcommand)]
        cmd: commands::transactions::TransactionCommands,
    },

    #[command(about = "Driver roster")]
    Drivers {
        #[command(subcommand)]
        cmd: commands::drivers::DriverCommands,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Gateway handle plus the credential the CLI reads with
pub struct CliContext {
    pub gateway: Arc<dyn Gateway>,
    pub session: Session,
}

impl CliContext {
    /// Operators read with the service key when one is configured, else anonymously
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let gateway = HttpGateway::new(config.gateway.clone()).context("failed to build gateway client")?;
        let session = match &config.gateway.service_key {
            Some(key) => Session::bearer(key.clone()),
            None => Session::anonymous(),
        };
        Ok(Self {
            gateway: Arc::new(gateway),
            session,
        })
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let context = CliContext::from_config(crate::config::config())?;

    match cli.command {
        Commands::Transactions { cmd } => commands::transactions::handle(cmd, &context, output_format).await,
        Commands::Drivers { cmd } => commands::drivers::handle(cmd, &context, output_format).await,
    }
}
