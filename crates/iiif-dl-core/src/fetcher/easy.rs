//! libcurl-backed fetcher.

use curl::easy::Easy;

use super::{FetchOptions, Fetcher, Transport};
use crate::control::CancelToken;
use crate::error::FetchError;

/// Blocking GET via a fresh `curl::easy::Easy` handle per request, so the
/// fetcher itself can be shared across worker threads.
#[derive(Debug, Clone, Default)]
pub struct CurlFetcher {
    options: FetchOptions,
}

impl CurlFetcher {
    pub fn new(options: FetchOptions) -> Self {
        Self { options }
    }

    fn configure(&self, easy: &mut Easy, url: &str, transport: Transport) -> Result<(), curl::Error> {
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(self.options.follow_redirects)?;
        easy.max_redirections(self.options.max_redirects)?;
        easy.connect_timeout(self.options.connect_timeout)?;
        easy.timeout(self.options.timeout)?;
        easy.useragent(&self.options.user_agent)?;
        // Needed for the progress callback to fire (cancellation checks).
        easy.progress(true)?;
        if transport == Transport::Tls {
            easy.ssl_verify_peer(true)?;
            easy.ssl_verify_host(true)?;
        }
        Ok(())
    }
}

impl Fetcher for CurlFetcher {
    fn fetch(&self, url: &str, cancel: &CancelToken) -> Result<Vec<u8>, FetchError> {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled { url: url.to_string() });
        }
        let transport = Transport::for_url(url)?;
        tracing::trace!(url, ?transport, "GET");

        let mut easy = Easy::new();
        self.configure(&mut easy, url, transport)
            .map_err(|e| transport_error(url, e))?;

        // Always buffer the whole response, error bodies included, so the
        // connection is drained before the handle is dropped.
        let mut body = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(|e| transport_error(url, e))?;
            transfer
                .progress_function(|_, _, _, _| !cancel.is_cancelled())
                .map_err(|e| transport_error(url, e))?;
            if let Err(e) = transfer.perform() {
                if e.is_aborted_by_callback() && cancel.is_cancelled() {
                    return Err(FetchError::Cancelled { url: url.to_string() });
                }
                return Err(transport_error(url, e));
            }
        }

        let code = easy.response_code().map_err(|e| transport_error(url, e))?;
        if !(200..300).contains(&code) {
            tracing::debug!(url, status = code, discarded = body.len(), "non-success response");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: code,
            });
        }
        Ok(body)
    }
}

fn transport_error(url: &str, source: curl::Error) -> FetchError {
    FetchError::Transport {
        url: url.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unsupported_scheme_without_network() {
        let fetcher = CurlFetcher::default();
        let err = fetcher
            .fetch("file:///etc/hostname", &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, FetchError::UnsupportedScheme { .. }));
    }

    #[test]
    fn cancelled_token_short_circuits() {
        let fetcher = CurlFetcher::default();
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = fetcher.fetch("http://127.0.0.1:9/a.jpg", &cancel).unwrap_err();
        assert!(err.is_cancelled());
    }
}
