pub mod models;
pub mod quota;
pub mod store;

pub use models::*;
pub use quota::{GateState, QuotaGate};
pub use store::{SessionHandle, SessionState, SessionStore};
