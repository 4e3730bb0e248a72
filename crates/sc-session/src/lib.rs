// Per-connection gait sessions and the request/response protocol for stridecast.

pub mod error;
pub mod protocol;
pub mod session;

pub use error::SessionError;
pub use protocol::{FrameRequest, Request, Response, dispatch};
pub use session::{GaitSession, SessionPhase};
