use std::path::PathBuf;

use anyhow::Context;
use clap::{value_parser, Arg, ArgMatches, Command};
use skills_server::{router, AppState, ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("skills-server")
        .version(skills_server::VERSION)
        .about("Skills self-assessment and manager review service")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("port")
                .long("port")
                .short('p')
                .value_parser(value_parser!(u16))
                .help("Port to listen on (default 5000)"),
        )
        .arg(
            Arg::new("data-file")
                .long("data-file")
                .value_parser(value_parser!(PathBuf))
                .help("JSON snapshot file; responses are kept in memory when omitted"),
        )
        .arg(
            Arg::new("taxonomy")
                .long("taxonomy")
                .value_parser(value_parser!(PathBuf))
                .help("YAML or JSON taxonomy file; built-in tables when omitted"),
        )
}

fn resolve_config(matches: &ArgMatches) -> anyhow::Result<ServerConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ServerConfig::default(),
    };

    if let Some(port) = matches.get_one::<u16>("port") {
        config = config.with_port(*port);
    }
    if let Some(path) = matches.get_one::<PathBuf>("data-file") {
        config = config.with_data_file(path.clone());
    }
    if let Some(path) = matches.get_one::<PathBuf>("taxonomy") {
        config = config.with_taxonomy_file(path.clone());
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    let config = resolve_config(&matches)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let state = AppState::from_config(&config)
        .await
        .context("building application state")?;

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "Skills server listening");

    axum::serve(listener, router(state))
        .await
        .context("server error")?;
    Ok(())
}
