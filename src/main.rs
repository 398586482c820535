#[macro_use]
extern crate log;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use hostsmith::config::{self, Config};
use hostsmith::hosts::HostsFile;

mod cmds;

#[derive(Parser)]
#[command(name = "hostsmith")]
#[command(version)]
#[command(about = "Inspect and toggle entries of the system hosts file.", long_about = None)]
struct Cli {
    /// Read settings from a TOML file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Use this hosts file instead of the configured one
    #[arg(long, value_name = "FILE", global = true)]
    hosts: Option<PathBuf>,

    /// Do not write a backup before modifying the hosts file
    #[arg(long, global = true)]
    no_backup: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the ip mappings, including disabled ones
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the hosts file as is
    Raw,
    /// Print whether the mapping of an ip is enabled
    Status { ip: String },
    /// Enable or disable every mapping of an ip
    Toggle {
        ip: String,
        /// Ask for administrator rights when the file is not writable
        #[arg(long)]
        elevate: bool,
    },
    /// Print whether the hosts file is readable and writable
    Access,
    /// Check the syntax of a domain name
    CheckDomain { domain: String },
    /// Check that a number is a legal port
    CheckPort {
        #[arg(allow_negative_numbers = true)]
        port: f64,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut c = match &cli.config {
        Some(path) => config::read_from_toml(path)?,
        None => Config::default(),
    };

    if let Some(path) = &cli.hosts {
        c.hosts.path = Some(path.to_string_lossy().into_owned());
    }
    if cli.no_backup {
        c.hosts.backup = false;
    }

    Ok(c)
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let c = load_config(&cli)?;

    match &c.logger {
        Some(lc) => hostsmith::setup_logger(lc)?,
        None => {
            let lc = hostsmith::logger::Config::default();
            hostsmith::setup_logger(&lc)?;
        }
    }

    let hosts = HostsFile::from_config(&c.hosts);

    match cli.command {
        Commands::List { json } => cmds::list(&hosts, json).await,
        Commands::Raw => cmds::raw(&hosts).await,
        Commands::Status { ip } => cmds::status(&hosts, &ip).await,
        Commands::Toggle { ip, elevate } => cmds::toggle(&hosts, &ip, elevate).await,
        Commands::Access => cmds::access(&hosts).await,
        Commands::CheckDomain { domain } => Ok(cmds::check_domain(&domain)),
        Commands::CheckPort { port } => Ok(cmds::check_port(port)),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            debug!("command failed: {:?}", e);
            eprintln!("error: {}", e);
            cmds::exit_code(&e)
        }
    }
}
