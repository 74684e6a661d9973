//! Socket plumbing: plain TCP or TLS, framed by [`LineCodec`].

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;
use tokio_util::codec::Framed;
use tracing::{debug, warn};

use crate::config::Endpoint;
use crate::error::{ConnectionError, ProtocolError};
use crate::line::LineCodec;

#[allow(clippy::large_enum_variant)]
pub enum Transport {
    Tcp {
        framed: Framed<TcpStream, LineCodec>,
    },
    Tls {
        framed: Framed<TlsStream<TcpStream>, LineCodec>,
    },
}

impl Transport {
    /// Dial `endpoint`, wrapping the stream in TLS when it is secure.
    pub async fn connect(endpoint: &Endpoint, codec: LineCodec) -> Result<Self, ConnectionError> {
        let stream = TcpStream::connect((endpoint.host.as_str(), endpoint.port)).await?;
        if let Err(e) = Self::enable_keepalive(&stream) {
            warn!("failed to enable TCP keepalive: {}", e);
        }

        if !endpoint.secure {
            return Ok(Self::tcp(stream, codec));
        }

        let server_name = ServerName::try_from(endpoint.host.clone())
            .map_err(|_| ConnectionError::InvalidServerName(endpoint.host.clone()))?;
        let stream = tls_connector()
            .connect(server_name, stream)
            .await
            .map_err(ConnectionError::Tls)?;
        debug!(host = %endpoint.host, "TLS handshake completed");
        Ok(Self::tls(stream, codec))
    }

    pub fn tcp(stream: TcpStream, codec: LineCodec) -> Self {
        Self::Tcp {
            framed: Framed::new(stream, codec),
        }
    }

    pub fn tls(stream: TlsStream<TcpStream>, codec: LineCodec) -> Self {
        Self::Tls {
            framed: Framed::new(stream, codec),
        }
    }

    fn enable_keepalive(stream: &TcpStream) -> Result<()> {
        use socket2::{SockRef, TcpKeepalive};

        let sock = SockRef::from(stream);
        let keepalive = TcpKeepalive::new()
            .with_time(Duration::from_secs(120))
            .with_interval(Duration::from_secs(30));

        sock.set_tcp_keepalive(&keepalive)?;
        Ok(())
    }

    pub fn is_tls(&self) -> bool {
        matches!(self, Self::Tls { .. })
    }

    /// Next complete line, or `None` once the peer has closed.
    pub async fn read_line(&mut self) -> Result<Option<String>, ProtocolError> {
        macro_rules! read_framed {
            ($framed:expr) => {
                $framed.next().await.transpose()
            };
        }

        match self {
            Transport::Tcp { framed } => read_framed!(framed),
            Transport::Tls { framed } => read_framed!(framed),
        }
    }

    pub async fn write_line(&mut self, line: String) -> Result<(), ProtocolError> {
        macro_rules! write_framed {
            ($framed:expr, $line:expr) => {
                $framed.send($line).await
            };
        }

        match self {
            Transport::Tcp { framed } => write_framed!(framed, line),
            Transport::Tls { framed } => write_framed!(framed, line),
        }
    }

    /// Flush pending writes and shut the write half down.
    pub async fn shutdown(&mut self) -> Result<(), ProtocolError> {
        use tokio::io::AsyncWriteExt;

        match self {
            Transport::Tcp { framed } => {
                framed.flush().await?;
                framed.get_mut().shutdown().await?;
            }
            Transport::Tls { framed } => {
                framed.flush().await?;
                framed.get_mut().shutdown().await?;
            }
        }
        Ok(())
    }
}

fn tls_connector() -> TlsConnector {
    let roots = RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    };
    let config = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();
    TlsConnector::from(Arc::new(config))
}
