//! Splash engine: IO pipeline and effect execution.
mod connectivity;
mod decode;
mod engine;
mod fetch;
mod inject;
mod types;

pub use connectivity::{ConnectivityProbe, TcpProbe};
pub use decode::{decode_text, DecodeFailure, DecodedText};
pub use engine::{EngineConfig, EngineHandle};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use inject::{
    base_href, build_document, InjectError, InjectedDocument, LoggingScriptSink, ScriptSink,
};
pub use types::{EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput};
