use crate::{
    config::Config,
    error::LedgerPeerError,
    server::{state::StateStore, LedgerPeer},
};

use booking_ledger::rpc::ledger_gateway_server::LedgerGatewayServer;
use hyper::server::conn::Http;
use std::{net::SocketAddr, sync::Arc};
use tokio::{
    net::{TcpListener, TcpStream},
    signal,
};
use tokio_rustls::TlsAcceptor;
use tonic::transport::{server::Routes, Server};
use tracing::{error, info};

/// Starts a ledger peer based on the given config and world state.
pub async fn start_ledger_peer<S: StateStore>(
    config: Config,
    state: Arc<S>,
) -> Result<(), LedgerPeerError> {
    info!("Starting ledger peer");
    let listener = TcpListener::bind(SocketAddr::new(config.address, config.port)).await?;
    let peer = LedgerPeer::new(config, state);
    info!("Ledger peer listening on {}", listener.local_addr()?);

    // Wait for the server to finish
    tokio::select! {
        _ = signal::ctrl_c() => info!("Terminated by user"),
        result = serve(listener, peer) => {
            if let Err(e) = result {
                error!("Error: {}", e);
            }
        },
    }
    Ok(())
}

/// Accepts connections on `listener` and sends them through our service
/// stack. Runs until the task is dropped.
pub async fn serve<S: StateStore>(
    listener: TcpListener,
    peer: LedgerPeer<S>,
) -> Result<(), LedgerPeerError> {
    let tls_acceptor = TlsAcceptor::from(Arc::new(peer.config().tls_config.clone()));

    let svc = Server::builder()
        .add_service(LedgerGatewayServer::new(peer))
        .into_service();

    let mut http = Http::new();
    let _ = http.http2_only(true);

    loop {
        let (conn, _) = match listener.accept().await {
            Ok(incoming) => incoming,
            Err(e) => {
                error!("Error accepting connection: {}", e);
                continue;
            }
        };

        let http = http.clone();
        let tls_acceptor = tls_acceptor.clone();
        let svc = svc.clone();

        // Spawn a task to handle each connection
        let _ = tokio::spawn(async move {
            if let Err(e) = handle_connection(http, conn, tls_acceptor, svc).await {
                // Log the error but don't bother returning it since it has nowhere to go.
                error!("{}", e);
            }
        });
    }
}

/// Processes an individual connection through our service stack including TLS
/// and our `tonic` handler.
async fn handle_connection(
    http: Http,
    connection: TcpStream,
    tls_acceptor: TlsAcceptor,
    service: Routes,
) -> Result<(), LedgerPeerError> {
    let conn = tls_acceptor.accept(connection).await?;
    let svc = tower::ServiceBuilder::new().service(service);
    http.serve_connection(conn, svc).await?;

    Ok(())
}
