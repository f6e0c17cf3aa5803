use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use ftp_publish::validation::{validate_port, validate_timeout};
use ftp_publish::{
    probe_connection, BuildInfo, ConfigManager, FtpHostConfiguration, ProbeParameters, Secret,
    DEFAULT_PORT, DEFAULT_TIMEOUT,
};

#[derive(Debug, Parser)]
#[command(name = "ftp-publish", version, about = "Manage FTP publish hosts and test sessions")]
struct Cli {
    /// Hosts file to use instead of the default one
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write logs to a timestamped file in this directory
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Show verbose messages, repeat for more
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List configured hosts
    Hosts {
        #[arg(long)]
        json: bool,
    },
    /// Add a host configuration
    Add {
        #[arg(long)]
        name: String,
        #[command(flatten)]
        conn: ConnectionArgs,
        /// Directory to enter after login
        #[arg(long)]
        remote_root: Option<String>,
    },
    /// Remove a host configuration
    Remove { name: String },
    /// Validate every configured host
    Check,
    /// Connect and log in without saving anything
    TestConnection {
        #[command(flatten)]
        conn: ConnectionArgs,
        #[arg(long)]
        json: bool,
    },
    /// Open a session to a configured host and print its remote root
    Connect {
        name: String,
        #[arg(long, default_value = "local")]
        build_id: String,
    },
}

#[derive(Debug, Args)]
struct ConnectionArgs {
    #[arg(long)]
    hostname: String,
    #[arg(long, default_value_t = DEFAULT_PORT.to_string())]
    port: String,
    #[arg(long, default_value = "anonymous")]
    username: String,
    #[arg(long, env = "FTP_PUBLISH_PASSWORD", hide_env_values = true, default_value = "")]
    password: String,
    /// Milliseconds, 0 disables
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.to_string())]
    timeout: String,
    /// Use active data connections instead of passive
    #[arg(long)]
    active: bool,
}

impl ConnectionArgs {
    fn to_probe_parameters(&self) -> Result<ProbeParameters> {
        Ok(ProbeParameters {
            hostname: self.hostname.clone(),
            port: validate_port(&self.port)?,
            username: self.username.clone(),
            password: Secret::new(self.password.clone()),
            timeout: validate_timeout(&self.timeout)?,
            use_active_mode: self.active,
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli)?;

    let config_manager = match &cli.config {
        Some(path) => ConfigManager::with_hosts_file(path),
        None => ConfigManager::new()?,
    };
    debug!("Using hosts file {:?}", config_manager.get_hosts_path());

    match cli.command {
        Command::Hosts { json } => list_hosts(&config_manager, json),
        Command::Add {
            name,
            conn,
            remote_root,
        } => {
            let params = conn.to_probe_parameters()?;
            let host = FtpHostConfiguration::new(name, params.hostname, params.username, params.password)
                .with_port(params.port)
                .with_timeout(params.timeout)
                .with_active_data(params.use_active_mode)
                .with_remote_root_dir(remote_root);
            let mut registry = config_manager.load_hosts()?;
            let name = host.name.clone();
            registry.add(host)?;
            config_manager.save_hosts(&registry)?;
            println!("Added host '{}'", name);
            Ok(())
        }
        Command::Remove { name } => {
            let mut registry = config_manager.load_hosts()?;
            if registry.remove(&name).is_none() {
                bail!("no host named '{}'", name);
            }
            config_manager.save_hosts(&registry)?;
            println!("Removed host '{}'", name);
            Ok(())
        }
        Command::Check => {
            let registry = config_manager.load_hosts()?;
            let mut failed = 0;
            for host in registry.iter() {
                match host.validate() {
                    Ok(()) => println!("{}: ok", host.name),
                    Err(e) => {
                        failed += 1;
                        println!("{}: {}", host.name, e);
                    }
                }
            }
            if failed > 0 {
                bail!("{} of {} hosts are invalid", failed, registry.len());
            }
            Ok(())
        }
        Command::TestConnection { conn, json } => {
            let params = conn.to_probe_parameters()?;
            let result = probe_connection(&params);
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result.message);
            }
            if !result.success {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Connect { name, build_id } => {
            let registry = config_manager.load_hosts()?;
            let host = registry.get(&name)?;
            let workspace = std::env::current_dir().context("Failed to get current directory")?;
            let build_info = BuildInfo::new(build_id, workspace).with_verbose(cli.verbose > 0);
            let root = host
                .with_session(&build_info, |session| {
                    Ok(session.absolute_remote_root().to_string())
                })
                .with_context(|| format!("Failed to open a session to '{}'", name))?;
            println!("{}", root);
            Ok(())
        }
    }
}

fn list_hosts(config_manager: &ConfigManager, json: bool) -> Result<()> {
    let registry = config_manager.load_hosts()?;
    if json {
        let hosts: Vec<serde_json::Value> = registry
            .iter()
            .map(|h| {
                serde_json::json!({
                    "name": h.name,
                    "hostname": h.hostname,
                    "port": h.port,
                    "username": h.username,
                    "remote_root_dir": h.remote_root_dir,
                    "timeout": h.timeout,
                    "use_active_data": h.use_active_data,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&hosts)?);
        return Ok(());
    }

    if registry.is_empty() {
        println!("No hosts configured in {:?}", config_manager.get_hosts_path());
        return Ok(());
    }
    for h in registry.iter() {
        println!(
            "{}\t{}@{}:{}\t{}\t{}",
            h.name,
            h.username,
            h.hostname,
            h.port,
            h.effective_remote_root().unwrap_or("-"),
            if h.use_active_data { "active" } else { "passive" }
        );
    }
    Ok(())
}

fn setup_logging(cli: &Cli) -> Result<()> {
    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("ftp_publish={}", level).parse()?);

    match &cli.log_dir {
        Some(log_dir) => {
            if !log_dir.exists() {
                std::fs::create_dir_all(log_dir)?;
            }
            let log_file = log_dir.join(format!(
                "ftp-publish_{}.log",
                Local::now().format("%Y%m%d_%H%M%S")
            ));
            let file = File::create(&log_file)
                .with_context(|| format!("Failed to create log file {:?}", log_file))?;
            fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(file)
                .init();
        }
        None => {
            fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}
