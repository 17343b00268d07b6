mod api;
mod common;
mod probe;

use anyhow::Result;
use api::server::ApiServer;
use clap::Parser;
use common::config::{Config, DEFAULT_PORT};
use common::logging::init_logging;
use probe::ProbeKind;
use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "portman")]
#[command(about = "Local HTTP API listing listening ports and the processes behind them")]
struct Args {
    /// Address to listen on
    #[arg(long, env = "PORTMAN_BIND", default_value = "127.0.0.1")]
    bind: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "PORTMAN_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Serve a front end from this directory for non-API paths
    #[arg(long, env = "PORTMAN_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Backend used to inspect processes
    #[arg(long, env = "PORTMAN_PROBE", value_enum, default_value = "command")]
    probe: ProbeKind,

    /// Minimum log level on stderr
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,

    /// Also write a debug log to the cache directory
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_level, args.debug)?;

    let config = Config::new(args.bind, args.port, args.static_dir, args.probe);
    ApiServer::new(config).run().await
}
