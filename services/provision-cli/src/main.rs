// services/provision-cli/src/main.rs
//
// Provisioning CLI for the node simulator catalog: create verticals,
// parameters and nodes, and browse what the backend currently serves.

mod api;
mod forms;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::ProvisionClient;
use simkit::config::load_config;
use simkit::errors::PanelError;
use simkit::units;

#[derive(Parser, Debug)]
#[command(name = "provision-cli")]
#[command(about = "Provisioning forms for the node simulator catalog")]
#[command(version = "0.1.0")]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config/provision")]
    config: String,

    /// Catalog API base URL (overrides config)
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a vertical (name is stored uppercased, must be unique)
    CreateVertical { name: String },

    /// Create a parameter bound to a vertical
    CreateParameter {
        name: String,
        #[arg(long)]
        min: String,
        #[arg(long)]
        max: String,
        #[arg(long)]
        vertical_id: i64,
        #[arg(long, default_value = "number")]
        data_type: String,
    },

    /// Create a node (starts in the stopped state)
    CreateNode {
        node_id: String,
        #[arg(long)]
        platform: String,
        #[arg(long, default_value = "https")]
        protocol: String,
        #[arg(long, default_value_t = 0)]
        hours: u64,
        #[arg(long, default_value_t = 0)]
        minutes: u64,
        #[arg(long, default_value_t = 0)]
        seconds: u64,
        /// Parameter ids to attach, comma-separated
        #[arg(long = "parameters", value_delimiter = ',')]
        parameters: Vec<i64>,
        #[arg(long)]
        vertical_id: i64,
    },

    /// List catalog entities
    List {
        #[command(subcommand)]
        what: ListCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ListCommand {
    Verticals,
    Nodes {
        #[arg(long)]
        vertical_id: Option<i64>,
    },
    Parameters {
        #[arg(long)]
        vertical_id: i64,
    },
    Platforms,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "provision_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let mut cfg = load_config(&args.config)?;
    if let Some(url) = &args.api_url {
        cfg.api_url = url.clone();
    }
    let client = ProvisionClient::new(&cfg)?;

    match run(&args.command, &client) {
        Ok(()) => Ok(()),
        Err(e) => {
            match &e {
                PanelError::Validation(msg) => error!("Invalid input: {}", msg),
                PanelError::Conflict(msg) => error!("{}", msg),
                other => error!("{}", other),
            }
            Err(e.into())
        }
    }
}

fn run(command: &Command, client: &ProvisionClient) -> Result<(), PanelError> {
    match command {
        Command::CreateVertical { name } => {
            let form = forms::vertical_form(name)?;
            let created = client.create_vertical(&form)?;
            info!("Created vertical {} (id {})", created.name, created.id);
        }
        Command::CreateParameter {
            name,
            min,
            max,
            vertical_id,
            data_type,
        } => {
            let form = forms::parameter_form(name, min, max, *vertical_id, data_type)?;
            let created = client.create_parameter(&form)?;
            info!(
                "Created parameter {} [{}..{}] (id {})",
                created.name, created.min_value, created.max_value, created.id
            );
        }
        Command::CreateNode {
            node_id,
            platform,
            protocol,
            hours,
            minutes,
            seconds,
            parameters,
            vertical_id,
        } => {
            let form = forms::node_form(
                node_id,
                platform,
                protocol,
                *hours,
                *minutes,
                *seconds,
                parameters,
                *vertical_id,
            )?;
            let created = client.create_node(&form)?;
            info!(
                "Created node {} on {} every {}",
                created.node_id,
                created.platform,
                units::seconds_to_hms(created.frequency)
            );
        }
        Command::List { what } => list(what, client)?,
    }
    Ok(())
}

fn list(what: &ListCommand, client: &ProvisionClient) -> Result<(), PanelError> {
    match what {
        ListCommand::Verticals => {
            for vertical in client.list_verticals()? {
                println!("{:>4}  {}", vertical.id, vertical.name);
            }
        }
        ListCommand::Nodes { vertical_id } => {
            let nodes = match vertical_id {
                Some(id) => client.nodes_by_vertical(*id)?,
                None => client.list_nodes()?,
            };
            for node in nodes {
                println!(
                    "{:<12}  {:<10}  {:<6}  {:>9}  {}",
                    node.node_id,
                    node.platform,
                    node.protocol,
                    units::seconds_to_hms(node.frequency),
                    node.services
                );
            }
        }
        ListCommand::Parameters { vertical_id } => {
            for p in client.parameters_by_vertical(*vertical_id)? {
                println!(
                    "{:>4}  {:<16}  [{} .. {}]  {}",
                    p.id, p.name, p.min_value, p.max_value, p.data_type
                );
            }
        }
        ListCommand::Platforms => {
            for platform in client.platforms()? {
                println!("{}", platform);
            }
        }
    }
    Ok(())
}
