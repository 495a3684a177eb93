pub mod error;
pub mod notice;
pub mod outcome;
pub mod session;

pub use error::{AppError, GatewayError};
pub use notice::{Confirmation, Notice, NoticeLevel, NoticeLog, Notifier, Preconfirmed};
pub use outcome::Outcome;
pub use session::{MemorySessionStore, Role, Session, SessionError, SessionStore};
