//! Crashbridge IPC server - main entry point.
//!
//! Starts the TCP+msgpack IPC server with the default collaborators wired in:
//! - TracingBackend: records reporting calls as structured log events
//! - ProcessAbortHandoff: forced crashes terminate this process

use clap::Parser;
use crashbridge_core::backend::TracingBackend;
use crashbridge_core::ipc::IpcServer;
use crashbridge_core::report::ProcessAbortHandoff;
use crashbridge_core::{Bridge, Config};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "crashbridge-server", about = "Crash-reporting bridge IPC server")]
struct Args {
    /// IPC listen address (overrides config default)
    #[arg(long, env = "CRASHBRIDGE_LISTEN")]
    listen: Option<String>,

    /// Maximum concurrent TCP connections
    #[arg(long)]
    max_connections: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration
    let mut config = Config::default();
    if let Some(listen) = args.listen {
        config.server.listen_addr = listen;
    }
    if let Some(max_connections) = args.max_connections {
        config.ipc.max_connections = max_connections;
    }

    // Initialize observability
    crashbridge_core::observability::init_tracing(&config.observability);

    // Wire the default collaborators into the bridge
    let bridge = Arc::new(Bridge::new(
        Arc::new(TracingBackend),
        Arc::new(ProcessAbortHandoff),
    ));

    let addr = config.server.listen_addr.parse()?;
    let server = Arc::new(IpcServer::new(bridge, addr, config.ipc));

    tracing::info!("Crashbridge server starting on {}", addr);

    // Serve until ctrl-c
    let serve_handle = {
        let server = server.clone();
        tokio::spawn(async move { server.serve().await })
    };

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown requested");
    server.shutdown();
    serve_handle.await??;

    Ok(())
}
