//! Outbound requests: the only place the pipeline touches the network.
//!
//! `Transport` wraps a single-attempt [`HttpGet`] backend with the shared
//! [`RetryPolicy`], the client-identification header EDGAR requires, and a
//! polite pause after every successful response. Everything above this
//! layer depends on the [`Fetch`] trait only.

mod cancel;
mod http;

pub use cancel::CancelToken;
pub use http::{CurlHttp, HttpGet, HttpResponse};

use std::collections::HashMap;
use std::time::Duration;

use crate::config::{duration_from_secs, ThirteenfConfig};
use crate::retry::{run_with_retry, AttemptError, RetryError, RetryPolicy, Sleeper, ThreadSleeper};

/// A request that could not produce a body.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Non-2xx status that is not worth retrying.
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u32 },
    /// Non-retryable curl failure (malformed URL, TLS setup, ...).
    #[error("GET {url} failed: {cause}")]
    Failed {
        url: String,
        #[source]
        cause: AttemptError,
    },
    /// Retry budget spent on timeouts, connection failures or throttling.
    #[error("GET {url} failed after {attempts} attempt(s): {last}")]
    Exhausted {
        url: String,
        attempts: u32,
        #[source]
        last: AttemptError,
    },
    #[error("GET {url} cancelled")]
    Cancelled { url: String },
}

impl TransportError {
    fn from_retry(url: &str, e: RetryError) -> Self {
        let url = url.to_string();
        match e {
            RetryError::Rejected {
                cause: AttemptError::Http(status),
                ..
            } => TransportError::Status { url, status },
            RetryError::Rejected { cause, .. } => TransportError::Failed { url, cause },
            RetryError::Exhausted { attempts, last } => TransportError::Exhausted {
                url,
                attempts,
                last,
            },
            RetryError::Cancelled { .. } => TransportError::Cancelled { url },
        }
    }

    /// HTTP status behind the failure, if the server answered at all.
    pub fn status(&self) -> Option<u32> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Exhausted {
                last: AttemptError::Http(status),
                ..
            } => Some(*status),
            _ => None,
        }
    }
}

/// Fetch a URL and return its body as text.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<String, TransportError>;
}

/// Per-process transport settings.
#[derive(Debug, Clone)]
pub struct TransportOptions {
    /// Sent as `User-Agent` on every request. EDGAR rejects anonymous agents.
    pub user_agent: String,
    pub policy: RetryPolicy,
    /// Pause after each successful response.
    pub polite_delay: Duration,
}

impl TransportOptions {
    /// Options from the loaded config; `user_agent` overrides the configured
    /// agent when given.
    pub fn from_config(cfg: &ThirteenfConfig, user_agent: Option<&str>) -> Self {
        let user_agent = user_agent
            .map(str::trim)
            .filter(|ua| !ua.is_empty())
            .unwrap_or(&cfg.user_agent)
            .to_string();
        Self {
            user_agent,
            policy: cfg.retry_policy(),
            polite_delay: duration_from_secs(cfg.polite_delay_secs),
        }
    }
}

pub struct Transport<G = CurlHttp, S = ThreadSleeper> {
    http: G,
    sleeper: S,
    policy: RetryPolicy,
    polite_delay: Duration,
    headers: HashMap<String, String>,
    cancel: Option<CancelToken>,
}

impl Transport<CurlHttp, ThreadSleeper> {
    /// Curl-backed transport configured from `cfg`.
    pub fn from_config(cfg: &ThirteenfConfig, user_agent: Option<&str>) -> Self {
        let http = CurlHttp::with_timeout(Duration::from_secs(cfg.request_timeout_secs));
        Transport::new(http, TransportOptions::from_config(cfg, user_agent))
    }
}

impl<G: HttpGet> Transport<G, ThreadSleeper> {
    pub fn new(http: G, opts: TransportOptions) -> Self {
        let mut headers = HashMap::new();
        headers.insert("User-Agent".to_string(), opts.user_agent);
        Self {
            http,
            sleeper: ThreadSleeper,
            policy: opts.policy,
            polite_delay: opts.polite_delay,
            headers,
            cancel: None,
        }
    }
}

impl<G: HttpGet, S: Sleeper> Transport<G, S> {
    pub fn with_sleeper<S2: Sleeper>(self, sleeper: S2) -> Transport<G, S2> {
        Transport {
            http: self.http,
            sleeper,
            policy: self.policy,
            polite_delay: self.polite_delay,
            headers: self.headers,
            cancel: self.cancel,
        }
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

impl<G: HttpGet, S: Sleeper> Fetch for Transport<G, S> {
    fn fetch(&self, url: &str) -> Result<String, TransportError> {
        let body = run_with_retry(&self.policy, &self.sleeper, self.cancel.as_ref(), |attempt| {
            tracing::debug!(attempt, url, "GET");
            let resp = self.http.get(url, &self.headers)?;
            if !resp.is_success() {
                return Err(AttemptError::Http(resp.status));
            }
            Ok(resp.body)
        })
        .map_err(|e| TransportError::from_retry(url, e))?;

        if !self.polite_delay.is_zero() {
            self.sleeper.sleep(self.polite_delay);
        }
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    const OPERATION_TIMEDOUT: u32 = 28;

    /// Replays a fixed sequence of outcomes, one per attempt.
    struct Scripted(RefCell<VecDeque<Result<u32, u32>>>);

    impl Scripted {
        fn new(steps: &[Result<u32, u32>]) -> Self {
            Self(RefCell::new(steps.iter().copied().collect()))
        }

        fn remaining(&self) -> usize {
            self.0.borrow().len()
        }
    }

    impl HttpGet for Scripted {
        fn get(
            &self,
            _url: &str,
            headers: &HashMap<String, String>,
        ) -> Result<HttpResponse, curl::Error> {
            assert!(headers.contains_key("User-Agent"));
            match self.0.borrow_mut().pop_front().expect("unscripted attempt") {
                Ok(status) => Ok(HttpResponse {
                    status,
                    body: format!("status {status}").into_bytes(),
                }),
                Err(code) => Err(curl::Error::new(code as _)),
            }
        }
    }

    #[derive(Default)]
    struct Recorded(RefCell<Vec<Duration>>);

    impl Sleeper for Recorded {
        fn sleep(&self, d: Duration) {
            self.0.borrow_mut().push(d);
        }
    }

    fn opts(polite_delay: Duration) -> TransportOptions {
        TransportOptions {
            user_agent: "thirteenf-test/0.1 (test@example.com)".to_string(),
            policy: RetryPolicy::default(),
            polite_delay,
        }
    }

    fn transport(steps: &[Result<u32, u32>], polite: Duration) -> Transport<Scripted, Recorded> {
        Transport::new(Scripted::new(steps), opts(polite)).with_sleeper(Recorded::default())
    }

    #[test]
    fn throttled_twice_then_ok() {
        let t = transport(&[Ok(503), Ok(503), Ok(200)], Duration::ZERO);
        let body = t.fetch("https://example.test/x").unwrap();
        assert_eq!(body, "status 200");
        let sleeps = t.sleeper.0.borrow();
        assert!(sleeps.len() <= 2);
        assert_eq!(
            *sleeps,
            vec![Duration::from_millis(1500), Duration::from_secs(3)]
        );
    }

    #[test]
    fn timeouts_exhaust_budget() {
        let steps = [Err(OPERATION_TIMEDOUT); 3];
        let t = transport(&steps, Duration::ZERO);
        let err = t.fetch("https://example.test/x").unwrap_err();
        match err {
            TransportError::Exhausted { attempts, last, .. } => {
                assert_eq!(attempts, 3);
                assert!(matches!(last, AttemptError::Curl(ref e) if e.is_operation_timedout()));
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
        // Linear backoff between attempts, none after the last.
        assert_eq!(
            *t.sleeper.0.borrow(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
        assert_eq!(t.http.remaining(), 0);
    }

    #[test]
    fn not_found_fails_without_retry() {
        let t = transport(&[Ok(404), Ok(200)], Duration::ZERO);
        let err = t.fetch("https://example.test/missing").unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert!(matches!(err, TransportError::Status { status: 404, .. }));
        assert_eq!(t.http.remaining(), 1);
        assert!(t.sleeper.0.borrow().is_empty());
    }

    #[test]
    fn throttled_on_every_attempt_reports_last_status() {
        let t = transport(&[Ok(429), Ok(429), Ok(503)], Duration::ZERO);
        let err = t.fetch("https://example.test/x").unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(t.sleeper.0.borrow().len(), 2);
    }

    #[test]
    fn polite_delay_follows_success() {
        let t = transport(&[Ok(200)], Duration::from_millis(500));
        t.fetch("https://example.test/x").unwrap();
        assert_eq!(*t.sleeper.0.borrow(), vec![Duration::from_millis(500)]);
    }

    #[test]
    fn cancelled_transport_sends_nothing() {
        let token = CancelToken::new();
        let t = transport(&[Ok(200)], Duration::ZERO).with_cancel(token.clone());
        token.cancel();
        let err = t.fetch("https://example.test/x").unwrap_err();
        assert!(matches!(err, TransportError::Cancelled { .. }));
        assert_eq!(t.http.remaining(), 1);
    }

    #[test]
    fn infinite_polite_delay_does_not_panic() {
        let cfg = ThirteenfConfig {
            polite_delay_secs: f64::INFINITY,
            ..ThirteenfConfig::default()
        };
        let o = TransportOptions::from_config(&cfg, None);
        assert_eq!(o.polite_delay, Duration::MAX);
    }

    #[test]
    fn user_agent_override_wins_over_config() {
        let cfg = ThirteenfConfig::default();
        let o = TransportOptions::from_config(&cfg, Some("Acme Research ops@acme.test"));
        assert_eq!(o.user_agent, "Acme Research ops@acme.test");
        let o = TransportOptions::from_config(&cfg, Some("  "));
        assert_eq!(o.user_agent, cfg.user_agent);
    }
}
