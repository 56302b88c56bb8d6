//! CLI command handlers, one file per subcommand.

mod completions;
mod locate;
mod man;
mod resolve;
mod snapshot;

pub use completions::run_completions;
pub use locate::run_locate;
pub use man::run_man;
pub use resolve::run_resolve;
pub use snapshot::{run_snapshot, SnapshotArgs};

use thirteenf_core::config::ThirteenfConfig;
use thirteenf_core::transport::Transport;

use super::interrupt;

/// Curl transport for `cfg`; Ctrl-C stops it from starting new requests.
fn edgar_transport(cfg: &ThirteenfConfig, user_agent: Option<&str>) -> Transport {
    Transport::from_config(cfg, user_agent).with_cancel(interrupt::cancel_token())
}
