use log::{error, info};
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::server::coordinator::Coordinator;

/// Listening socket plus the configuration its coordinator is built from.
pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
}

impl Server {
    pub async fn bind(config: ServerConfig) -> io::Result<Self> {
        let address = config.listen_address();
        let listener = match TcpListener::bind(&address).await {
            Ok(listener) => {
                info!("Server bound to {}", address);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", address, e);
                return Err(e);
            }
        };

        Ok(Self { listener, config })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the coordinator loop until `shutdown` resolves.
    ///
    /// Accepts, reader events and the shutdown signal are serviced one at a
    /// time. Shutdown is abrupt: open connections are dropped without notice.
    pub async fn run<F>(self, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()>,
    {
        let (mut coordinator, mut events) = Coordinator::new(&self.config);
        tokio::pin!(shutdown);

        info!("Waiting for players on {}", self.local_addr()?);

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("Shutting down server...");
                    break;
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        let (reader, writer) = stream.into_split();
                        coordinator.handle_accept(reader, writer, addr.to_string());
                    }
                    Err(e) => error!("Error accepting connection: {}", e),
                },
                Some(event) = events.recv() => coordinator.handle_event(event).await,
            }
        }

        coordinator.shutdown();
        Ok(())
    }
}
