pub mod config;
pub mod logging;

pub mod identifiers;
pub mod retry;
pub mod transport;

// Filing resolution and retrieval, leaf-first.
pub mod identity;
pub mod locator;
pub mod listing;
pub mod select;
pub mod retrieve;

// Collaborators downstream of the retrieved document.
pub mod infotable;
pub mod output;
pub mod pipeline;
pub mod summary;
