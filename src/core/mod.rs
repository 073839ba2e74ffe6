pub mod credential;
pub mod engine;
pub mod notifier;
pub mod roster;

pub use crate::domain::model::{
    BatchSummary, Credential, OutgoingEmail, RosterRow, RosterSource, SendOutcome, SourceFormat,
};
pub use crate::domain::ports::{ConfigProvider, InputProvider, MailTransport, Reporter};
pub use crate::utils::error::Result;
