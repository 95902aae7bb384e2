//! Tonecheck Mail
//!
//! Emailing comparison results:
//! - **Settings:** Host, port, sender, password and recipient, all required
//! - **Message:** MIME composition with the CSV export as an attachment
//! - **Transport:** Pluggable delivery; the outbox transport spools `.eml`
//!   files for a relay to pick up

pub mod message;
pub mod transport;

pub use message::*;
pub use transport::*;
