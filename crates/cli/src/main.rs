use clap::Parser;
use mhos_dns_domain::CliOverrides;
use tracing::info;

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "mhos-dns")]
#[command(version)]
#[command(about = "MHOS DNS - answers game-server domains locally, forwards the rest to the system resolver")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// IPv4 address to bind, or "auto" to use the outbound interface address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Domain table (INI sections with an `ip` key)
    #[arg(long, value_name = "FILE")]
    domains: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Print the loaded domain table and exit
    #[arg(long)]
    list_domains: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        bind_address: cli.bind.clone(),
        dns_port: cli.dns_port,
        domains_path: cli.domains.clone(),
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting MHOS DNS v{}", env!("CARGO_PKG_VERSION"));

    let services = di::DnsServices::new(&config);

    if cli.list_domains {
        for entry in services.table.entries() {
            println!("{:<32} {}", entry.pattern, entry.address);
        }
        return Ok(());
    }

    let bind_address = server::resolve_bind_address(&config.server);
    server::run_dns_server(services, bind_address).await?;

    info!("Server shutdown complete");
    Ok(())
}
