//! Fetcher: retrieves the raw content of one address over a TCP
//! connection.
//!
//! The fetcher owns its socket for the whole call and drops it on every
//! exit path. It writes a minimal `GET` request line with a `Host` header
//! and reads a bounded number of response bytes; no redirects are followed
//! and no wire-format parsing happens here. Anything that goes wrong is
//! folded into a [`FetchErrorKind`] — a failed fetch degrades to one crawl
//! event and never aborts the run.
//!
//! The `https` scheme is rejected up front, before any network activity:
//! this fetcher speaks plain TCP only.

use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, lookup_host};
use tokio::time::timeout;

use super::buffer_pool::BufferPool;
use crate::utils::{Address, Scheme};

/// Why a fetch produced no body.
///
/// All kinds are local to a single address; none of them is fatal to the
/// crawl run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum FetchErrorKind {
    /// The address uses a scheme this fetcher does not speak. Rejected
    /// before any connection attempt.
    #[error("unsupported scheme")]
    UnsupportedScheme,
    /// The host did not resolve to any socket address.
    #[error("host resolution failed")]
    ResolutionFailure,
    /// The TCP connection could not be established.
    #[error("connection failed")]
    ConnectFailure,
    /// Connecting or reading exceeded the fetch deadline before any byte
    /// arrived.
    #[error("timed out")]
    Timeout,
    /// The connection broke, or the server closed it without sending a
    /// single byte.
    #[error("i/o error")]
    IoError,
}

/// Outcome of fetching one address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// At least one response byte was read. `source_host` is the authority
    /// the body came from, used to resolve relative references.
    Fetched { body: Vec<u8>, source_host: String },
    Failed { reason: FetchErrorKind },
}

/// Per-fetch limits, derived from the crawler options.
#[derive(Debug, Clone)]
pub(crate) struct FetchSettings {
    pub(crate) timeout: Duration,
    pub(crate) max_body_bytes: usize,
}

/// Fetches `address`, returning either its raw response bytes or the
/// failure reason. Every path closes the connection before returning.
pub(crate) async fn fetch(
    address: &Address,
    settings: &FetchSettings,
    buffers: &BufferPool,
) -> FetchResult {
    if address.scheme() != Scheme::Http {
        debug!("skipping non-http address: {}", address);
        return FetchResult::Failed {
            reason: FetchErrorKind::UnsupportedScheme,
        };
    }

    let authority = address.authority();
    let lookup_target = format!(
        "{}:{}",
        address.host().trim_matches(['[', ']'].as_ref()),
        address.port()
    );

    let resolved = match timeout(settings.timeout, lookup_host(lookup_target)).await {
        Ok(Ok(mut addrs)) => match addrs.next() {
            Some(addr) => addr,
            None => {
                return FetchResult::Failed {
                    reason: FetchErrorKind::ResolutionFailure,
                };
            }
        },
        Ok(Err(_)) => {
            return FetchResult::Failed {
                reason: FetchErrorKind::ResolutionFailure,
            };
        }
        Err(_) => {
            return FetchResult::Failed {
                reason: FetchErrorKind::Timeout,
            };
        }
    };

    let mut stream = match timeout(settings.timeout, TcpStream::connect(resolved)).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => {
            debug!("connect to {} failed: {}", address, e);
            return FetchResult::Failed {
                reason: FetchErrorKind::ConnectFailure,
            };
        }
        Err(_) => {
            return FetchResult::Failed {
                reason: FetchErrorKind::Timeout,
            };
        }
    };

    let request = format!(
        "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        address.path(),
        authority
    );
    if stream.write_all(request.as_bytes()).await.is_err() {
        return FetchResult::Failed {
            reason: FetchErrorKind::IoError,
        };
    }

    let mut buf = buffers.get(settings.max_body_bytes);
    let mut filled = 0usize;

    let outcome = timeout(settings.timeout, async {
        loop {
            if filled == buf.len() {
                break Ok(());
            }
            match stream.read(&mut buf[filled..]).await {
                Ok(0) => break Ok(()),
                Ok(n) => filled += n,
                Err(e) => break Err(e),
            }
        }
    })
    .await;

    let reason = match outcome {
        Ok(Ok(())) if filled > 0 => None,
        Ok(Ok(())) => Some(FetchErrorKind::IoError),
        Ok(Err(_)) if filled > 0 => None,
        Ok(Err(_)) => Some(FetchErrorKind::IoError),
        Err(_) if filled > 0 => None,
        Err(_) => Some(FetchErrorKind::Timeout),
    };

    let result = match reason {
        Some(reason) => FetchResult::Failed { reason },
        None => FetchResult::Fetched {
            body: buf[..filled].to_vec(),
            source_host: authority,
        },
    };
    buffers.put(buf);
    result
}
