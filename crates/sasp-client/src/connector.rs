//! Outbound QUIC connection to a SASP server
//!
//! Opens the media stream, then the control stream, announces roles when
//! the server expects announcements, and exchanges commands on the control
//! stream.

use std::net::SocketAddr;

use bytes::Bytes;
use quinn::{Connection, Endpoint, RecvStream, SendStream};

use sasp_core::config::ClientConfig;
use sasp_core::net::resolve_addr;
use sasp_protocol::{CloseCode, FramedMessageChannel, RoleBinding, StreamRole};

use crate::error::ClientError;
use crate::tls::TrustPolicy;

/// Framed channel over one QUIC bidirectional stream
pub type StreamChannel = FramedMessageChannel<RecvStream, SendStream>;

fn resolve(address: &str) -> Result<SocketAddr, ClientError> {
    resolve_addr(address).map_err(|e| ClientError::Resolve {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

/// Establish a QUIC connection without opening any stream
///
/// The returned endpoint must outlive the connection.
pub async fn open_connection(
    config: &ClientConfig,
    trust: &TrustPolicy,
) -> Result<(Endpoint, Connection), ClientError> {
    let server_addr = resolve(&config.server_address)?;
    let bind_addr: SocketAddr = if server_addr.is_ipv4() {
        SocketAddr::from(([0, 0, 0, 0], 0))
    } else {
        SocketAddr::from(([0u16; 8], 0))
    };

    let mut endpoint = Endpoint::client(bind_addr).map_err(ClientError::Endpoint)?;
    endpoint.set_default_client_config(trust.quic_client_config(&config.alpn)?);

    tracing::debug!("Connecting to {} ({})", config.server_address, server_addr);
    let connecting = endpoint.connect(server_addr, &config.server_name)?;
    let connection = tokio::time::timeout(config.connect_timeout, connecting)
        .await
        .map_err(|_| ClientError::ConnectTimeout(config.connect_timeout))??;

    tracing::info!("Connected to {}", connection.remote_address());
    Ok((endpoint, connection))
}

/// An established SASP session
pub struct SaspClient {
    endpoint: Endpoint,
    connection: Connection,
    /// Held open for the life of the session, never read
    _media: StreamChannel,
    control: StreamChannel,
}

impl SaspClient {
    /// Connect and open both streams
    pub async fn connect(config: &ClientConfig, trust: TrustPolicy) -> Result<Self, ClientError> {
        let (endpoint, connection) = open_connection(config, &trust).await?;

        let (send, recv) = connection.open_bi().await?;
        let mut media = FramedMessageChannel::new(recv, send);
        let (send, recv) = connection.open_bi().await?;
        let mut control = FramedMessageChannel::new(recv, send);

        if config.role_binding == RoleBinding::Announced {
            media.write_frame(StreamRole::Media.announcement()).await?;
            control.write_frame(StreamRole::Control.announcement()).await?;
            tracing::debug!("Announced stream roles");
        }

        Ok(Self {
            endpoint,
            connection,
            _media: media,
            control,
        })
    }

    /// Send one command and wait for its response payload
    pub async fn send_command(&mut self, command: &[u8]) -> Result<Bytes, ClientError> {
        self.control
            .write_frame(Bytes::copy_from_slice(command))
            .await?;

        match self.control.read_frame().await? {
            Some(response) => Ok(response),
            None => Err(self.closed_error()),
        }
    }

    /// The underlying QUIC connection
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Finish the control stream and wait for the server to close
    ///
    /// Returns the close code the server reported.
    pub async fn finish(mut self) -> Result<CloseCode, ClientError> {
        // Already finished or reset; the server will close regardless
        let _ = self.control.send_mut().finish();

        let raw = match self.connection.closed().await {
            quinn::ConnectionError::ApplicationClosed(close) => close.error_code.into_inner(),
            other => return Err(ClientError::Connection(other)),
        };
        self.endpoint.wait_idle().await;
        CloseCode::from_u64(raw).ok_or(ClientError::UnknownCloseCode(raw))
    }

    /// Close the connection immediately
    pub async fn close(self) {
        let code = CloseCode::Normal;
        self.connection.close(code.as_u32().into(), code.reason());
        self.endpoint.wait_idle().await;
    }

    fn closed_error(&self) -> ClientError {
        match self.connection.close_reason() {
            Some(quinn::ConnectionError::ApplicationClosed(close)) => {
                let raw = close.error_code.into_inner();
                match CloseCode::from_u64(raw) {
                    Some(code) => ClientError::Closed(code),
                    None => ClientError::UnknownCloseCode(raw),
                }
            }
            Some(other) => ClientError::Connection(other),
            None => ClientError::StreamClosed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_rejects_garbage() {
        let err = resolve("not an address").unwrap_err();
        assert!(matches!(err, ClientError::Resolve { .. }));
        assert!(err.is_unreachable());
    }

    #[tokio::test]
    async fn test_connect_to_closed_port_times_out() {
        let config = ClientConfig {
            server_address: "127.0.0.1:9".to_string(),
            connect_timeout: std::time::Duration::from_millis(200),
            ..ClientConfig::default()
        };

        let result = open_connection(&config, &TrustPolicy::Insecure).await;
        assert!(matches!(result, Err(ClientError::ConnectTimeout(_))));
    }
}
