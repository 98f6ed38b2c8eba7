//! `partmaster serve` command - KiCad HTTP library server

use console::style;
use miette::{IntoDiagnostic, Result};
use tracing::{info, warn};

use crate::cli::helpers::load_config;
use crate::cli::GlobalOpts;
use crate::kicad::{Api, CatalogProjection, LibraryServer};

#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// Port to listen on (default: from config, else 8080)
    #[arg(long, short = 'p', env = "PARTMASTER_PORT")]
    pub port: Option<u16>,

    /// Address to bind (default: from config, else 0.0.0.0)
    #[arg(long, env = "PARTMASTER_BIND")]
    pub bind: Option<String>,

    /// Token required in `Authorization: Token <token>`; empty disables auth
    #[arg(long, env = "PARTMASTER_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

pub fn run(args: ServeArgs, global: &GlobalOpts) -> Result<()> {
    let mut config = load_config(global);
    if args.port.is_some() {
        config.port = args.port;
    }
    if args.bind.is_some() {
        config.bind = args.bind;
    }
    if args.token.is_some() {
        config.token = args.token;
    }

    let dir = config.partmaster_dir();
    if !dir.is_dir() {
        return Err(miette::miette!(
            "Partmaster directory '{}' does not exist",
            dir.display()
        ));
    }

    let projection = CatalogProjection::open(&dir);
    info!(
        dir = %dir.display(),
        stores = projection.catalog().stores().len(),
        sources = projection.catalog().sources().len(),
        "catalog loaded"
    );

    let token = config.token();
    if token.is_none() {
        warn!("no token configured, the API is open to anyone who can reach it");
    }

    let server = LibraryServer::bind(&config.bind(), config.port()).into_diagnostic()?;
    if !global.quiet {
        if let Some(addr) = server.local_addr() {
            eprintln!(
                "{} Serving {} on {}",
                style("✓").green(),
                style(dir.display()).cyan(),
                style(format!("http://{}/v1/", addr)).yellow()
            );
        }
    }

    server.run(Api::new(projection, token));
    Ok(())
}
