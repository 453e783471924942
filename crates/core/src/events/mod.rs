mod error;
mod traits;
mod types;

pub use error::{ChannelError, Result};
pub use traits::{EventChannel, EventHandler};
pub use types::{AuditEvent, MutationEvent, LOGS_TOPIC, MUTATIONS_TOPIC};
