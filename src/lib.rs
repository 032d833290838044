//! Vaani client - conversation session core
//!
//! A client for a remote question-answering service: a swappable transport
//! adapter, a synchronous conversation session that keeps a render-ready
//! transcript, and a runtime that drives the session against the transport.

pub mod config;
pub mod runtime;
pub mod session;
pub mod transport;

pub use config::{ClientConfig, ConfigError};
pub use runtime::{RuntimeError, SessionHandle, SessionRuntime};
pub use session::{Message, MessageKind, Sender, Session, SessionSnapshot};
pub use transport::{
    Answer, Attachment, AuthMode, Credentials, HttpTransport, LoggingTransport, RequestError,
    Transport,
};
