#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::{UnixListener, UnixStream};
use tracing::{error, info, warn};

use wayproxy_lib::config::load_from_path;
use wayproxy_lib::io::{ChannelSink, DirectionLoop};
use wayproxy_lib::protocol::object::{ObjectEntry, ObjectTable};
use wayproxy_lib::protocol::registry::WL_DISPLAY;
use wayproxy_lib::protocol::state::ProtoState;
use wayproxy_lib::telemetry::{init_tracing, Metrics, TracingLogger};
use wayproxy_lib::PassthroughFdMap;

#[derive(Parser, Debug)]
#[command(author, version, about = "Wayland protocol forwarding proxy")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, value_name = "FILE", default_value = "demos/config/basic.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let cfg = match load_from_path(&cli.config) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("failed to load configuration: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = init_tracing(&cfg.logging.level, cfg.logging.show_target) {
        eprintln!("failed to install tracing subscriber: {err}");
        std::process::exit(1);
    }

    info!(listen = ?cfg.listen, connect = ?cfg.connect, merge_margin = cfg.merge_margin, "configuration loaded");

    let Some(listen_path) = cfg.listen.clone() else {
        error!("no listen socket configured; nothing to accept connections from");
        std::process::exit(1);
    };
    let Some(connect_path) = cfg.connect.clone() else {
        error!("no connect socket configured; nothing to relay to");
        std::process::exit(1);
    };

    let _ = std::fs::remove_file(&listen_path);
    let listener = match UnixListener::bind(&listen_path) {
        Ok(l) => l,
        Err(err) => {
            error!(%err, path = %listen_path, "failed to bind listen socket");
            std::process::exit(1);
        }
    };

    loop {
        let (client_stream, _) = match listener.accept().await {
            Ok(pair) => pair,
            Err(err) => {
                warn!(%err, "failed to accept client connection");
                continue;
            }
        };

        let connect_path = connect_path.clone();
        let merge_margin = cfg.merge_margin;
        tokio::spawn(async move {
            if let Err(err) = relay_connection(client_stream, &connect_path, merge_margin).await {
                warn!(%err, "connection relay exited with error");
            }
        });
    }
}

/// Relay one client connection against a freshly dialed upstream connection,
/// running both directions concurrently until either side closes.
async fn relay_connection(
    client_stream: UnixStream,
    connect_path: &str,
    merge_margin: i32,
) -> std::io::Result<()> {
    let server_stream = UnixStream::connect(connect_path).await?;

    let (client_read, mut client_write) = client_stream.into_split();
    let (server_read, mut server_write) = server_stream.into_split();

    let (to_server_tx, mut to_server_rx) = tokio::sync::mpsc::unbounded_channel::<(Vec<u8>, Vec<i32>)>();
    let (to_client_tx, mut to_client_rx) = tokio::sync::mpsc::unbounded_channel::<(Vec<u8>, Vec<i32>)>();

    let logger = TracingLogger;
    let metrics = Arc::new(Metrics::new());

    let writer_to_server = tokio::spawn(async move {
        use tokio::io::AsyncWriteExt;
        while let Some((bytes, _fds)) = to_server_rx.recv().await {
            if server_write.write_all(&bytes).await.is_err() {
                break;
            }
        }
        let _ = server_write.flush().await;
    });

    let writer_to_client = tokio::spawn(async move {
        use tokio::io::AsyncWriteExt;
        while let Some((bytes, _fds)) = to_client_rx.recv().await {
            if client_write.write_all(&bytes).await.is_err() {
                break;
            }
        }
        let _ = client_write.flush().await;
    });

    let client_to_server = {
        let mut fd_map = PassthroughFdMap;
        let mut sink = ChannelSink::new(to_server_tx);
        let metrics = metrics.clone();
        let mut objects = ObjectTable::new();
        let _ = objects.insert(ObjectEntry { id: 1, interface: &WL_DISPLAY });
        let state = ProtoState::with_margin(merge_margin);
        tokio::spawn(async move {
            let mut direction = DirectionLoop::new(
                client_read,
                objects,
                state,
                &mut fd_map,
                &mut sink,
                &logger,
                metrics,
                true,
                false,
            );
            if let Err(err) = direction.run().await {
                warn!(%err, "client-to-server direction stopped");
            }
        })
    };

    let server_to_client = {
        let mut fd_map = PassthroughFdMap;
        let mut sink = ChannelSink::new(to_client_tx);
        let logger = TracingLogger;
        let metrics = metrics.clone();
        let mut objects = ObjectTable::new();
        let _ = objects.insert(ObjectEntry { id: 1, interface: &WL_DISPLAY });
        let state = ProtoState::with_margin(merge_margin);
        tokio::spawn(async move {
            let mut direction = DirectionLoop::new(
                server_read,
                objects,
                state,
                &mut fd_map,
                &mut sink,
                &logger,
                metrics,
                false,
                true,
            );
            if let Err(err) = direction.run().await {
                warn!(%err, "server-to-client direction stopped");
            }
        })
    };

    let _ = tokio::join!(client_to_server, server_to_client, writer_to_server, writer_to_client);
    Ok(())
}
