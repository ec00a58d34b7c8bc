use clap::Parser;
use markgate::config::Config;
use markgate::proxy::MarkgateProxy;
use pingora_core::server::configuration::Opt;
use pingora_core::server::Server;
use std::path::PathBuf;

/// Markgate - on-demand image watermarking relay built with Cloudflare's Pingora
#[derive(Parser, Debug)]
#[command(name = "markgate")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Daemon mode
    #[arg(short = 'd', long)]
    daemon: bool,

    /// Test configuration and exit
    #[arg(long)]
    test: bool,

    /// Upgrade workers gracefully
    #[arg(long)]
    upgrade: bool,
}

fn main() {
    // Initialize logging subsystem
    markgate::logging::init_subscriber().expect("Failed to initialize logging subsystem");

    // Parse command-line arguments
    let args = Args::parse();

    // Load configuration from file
    let config = Config::from_file(&args.config).unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::process::exit(1);
    });

    tracing::info!(
        config_file = %args.config.display(),
        server_address = %config.server.address,
        server_port = config.server.port,
        logo_path = %config.watermark.logo_path,
        "Configuration loaded successfully"
    );

    // Build Pingora server options
    let opt = Opt {
        daemon: args.daemon,
        test: args.test,
        upgrade: args.upgrade,
        ..Default::default()
    };

    // Create Pingora server
    let mut server = Server::new(Some(opt)).expect("Failed to create Pingora server");
    server.bootstrap();

    let listen_addr = format!("{}:{}", config.server.address, config.server.port);
    let threads = config.server.threads;

    // Create MarkgateProxy instance
    let proxy = MarkgateProxy::new(config).unwrap_or_else(|e| {
        eprintln!("Failed to initialize relay: {}", e);
        std::process::exit(1);
    });

    // Create HTTP proxy service
    let mut proxy_service = pingora_proxy::http_proxy_service(&server.configuration, proxy);
    proxy_service.threads = Some(threads);

    // Add TCP listener for HTTP
    proxy_service.add_tcp(&listen_addr);

    tracing::info!(
        address = %listen_addr,
        "Starting Markgate image relay"
    );

    // Register service with server
    server.add_service(proxy_service);

    // Run server forever (blocks until shutdown)
    server.run_forever();
}
