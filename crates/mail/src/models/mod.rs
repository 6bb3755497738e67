//! Domain models for the reader: message summaries and signed-in identity

mod identity;
mod message;

pub use identity::{AccessToken, UserIdentity};
pub use message::{MessageId, MessageSummary, ThreadId};
