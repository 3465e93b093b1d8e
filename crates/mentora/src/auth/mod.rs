pub mod backend;
pub mod bridge;
pub mod error;
pub mod mock;
pub mod model;
pub mod remote;

pub use backend::{AuthBackend, SessionHub};
pub use bridge::{SessionBridge, Subscription};
pub use error::{AuthError, Result};
pub use mock::MockAuthBackend;
pub use model::{
    AuthEvent, AuthEventKind, AuthState, Credentials, Session, SessionUpdate, SessionUser,
    SignUpMetadata,
};
pub use remote::RemoteAuthBackend;
