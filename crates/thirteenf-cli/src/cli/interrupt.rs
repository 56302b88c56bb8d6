//! Ctrl-C handling: the first SIGINT stops new requests so the command
//! fails with a cancellation error; a second one exits at once.

use std::sync::OnceLock;
use thirteenf_core::transport::CancelToken;

static TOKEN: OnceLock<CancelToken> = OnceLock::new();

extern "C" fn on_sigint(_signum: libc::c_int) {
    match TOKEN.get() {
        Some(token) if !token.is_cancelled() => token.cancel(),
        // SAFETY: `_exit` is async-signal-safe.
        _ => unsafe { libc::_exit(130) },
    }
}

/// Process-wide token tripped by Ctrl-C. The handler is installed on the
/// first call.
pub fn cancel_token() -> CancelToken {
    TOKEN
        .get_or_init(|| {
            let handler = on_sigint as extern "C" fn(libc::c_int);
            // SAFETY: the handler only does an atomic load/store or `_exit`.
            unsafe {
                libc::signal(libc::SIGINT, handler as libc::sighandler_t);
            }
            CancelToken::new()
        })
        .clone()
}
