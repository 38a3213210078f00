mod plugin;
mod protocol;
mod session;

pub use plugin::{GymServerPlugin, ServerConnection};
pub use protocol::{Command, Response, ServerError};
pub use session::ServerSession;
