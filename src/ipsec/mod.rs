//! IPsec text parsing
//!
//! Pure parsers for the daemon configuration file and the human-readable
//! output of `ipsec status`. Nothing in here performs I/O.

pub mod connections;
pub mod lines;
pub mod status;

pub use connections::{parse_connections, Connection};
pub use lines::extract_lines;
pub use status::{classify_status, TunnelStatus};
