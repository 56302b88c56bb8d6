//! Classify HTTP status and curl errors into retry policy error kinds.

use super::error::AttemptError;
use super::policy::ErrorKind;

/// Classify an HTTP status code for retry decisions.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        429 | 503 => ErrorKind::Throttled,
        _ => ErrorKind::Other,
    }
}

/// Classify a curl error for retry decisions.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_partial_file()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}

/// Classify an attempt error (curl or HTTP) into an ErrorKind.
pub fn classify(e: &AttemptError) -> ErrorKind {
    match e {
        AttemptError::Curl(ce) => classify_curl_error(ce),
        AttemptError::Http(code) => classify_http_status(*code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // libcurl error codes. `CURLcode` is unsigned on Unix and signed on
    // Windows.
    const COULDNT_CONNECT: u32 = 7;
    const OPERATION_TIMEDOUT: u32 = 28;
    const URL_MALFORMAT: u32 = 3;

    fn curl_err(code: u32) -> AttemptError {
        AttemptError::Curl(curl::Error::new(code as _))
    }

    #[test]
    fn http_429_and_503_throttled() {
        assert_eq!(classify_http_status(429), ErrorKind::Throttled);
        assert_eq!(classify_http_status(503), ErrorKind::Throttled);
    }

    #[test]
    fn other_statuses_not_retried() {
        assert_eq!(classify_http_status(404), ErrorKind::Other);
        assert_eq!(classify_http_status(403), ErrorKind::Other);
        assert_eq!(classify_http_status(500), ErrorKind::Other);
        assert_eq!(classify_http_status(502), ErrorKind::Other);
    }

    #[test]
    fn curl_network_failures() {
        assert_eq!(classify(&curl_err(OPERATION_TIMEDOUT)), ErrorKind::Timeout);
        assert_eq!(classify(&curl_err(COULDNT_CONNECT)), ErrorKind::Connection);
        assert_eq!(classify(&curl_err(URL_MALFORMAT)), ErrorKind::Other);
    }
}
