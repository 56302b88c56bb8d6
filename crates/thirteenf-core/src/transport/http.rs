//! Single-attempt HTTP GET over libcurl.

use std::collections::HashMap;
use std::time::Duration;

/// Status and body of one completed exchange (any status).
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One GET, no retries. Implemented by `CurlHttp` and by scripted backends
/// in tests.
pub trait HttpGet {
    fn get(&self, url: &str, headers: &HashMap<String, String>)
        -> Result<HttpResponse, curl::Error>;
}

/// Blocking GET with a fresh curl easy handle per call.
#[derive(Debug, Clone, Copy)]
pub struct CurlHttp {
    pub connect_timeout: Duration,
    /// Bounds the whole attempt, including the body transfer.
    pub timeout: Duration,
}

impl Default for CurlHttp {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(15),
        }
    }
}

impl CurlHttp {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            connect_timeout: timeout,
            timeout,
        }
    }
}

impl HttpGet for CurlHttp {
    fn get(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<HttpResponse, curl::Error> {
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        // Empty string = every encoding libcurl was built with.
        easy.accept_encoding("")?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;

        // Build curl list for custom headers (e.g. "Name: value").
        let mut list = curl::easy::List::new();
        for (k, v) in headers {
            list.append(&format!("{}: {}", k.trim(), v.trim()))?;
        }
        if !headers.is_empty() {
            easy.http_headers(list)?;
        }

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        Ok(HttpResponse { status, body })
    }
}
