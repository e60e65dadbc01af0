//! Maestro - a conversational command router for a Mopidy music server
//!
//! Free text goes in, music plays. A request travels through three stages:
//!
//! 1. **Resolution** ([`resolver`]) - single-word commands ("pause", "next")
//!    are matched from a fixed table; everything else is sent to a chat model
//!    that answers with a JSON `{action, parameters}` object. Resolution is
//!    total: anything unparseable becomes "search for what the user said".
//! 2. **Dispatch** ([`dispatcher`]) - one branch per [`Action`], searching
//!    the local library before YouTube and reporting progress through an
//!    [`EventSink`].
//! 3. **Adapters** ([`adapters`]) - Mopidy JSON-RPC and the YouTube Data
//!    API. Failures are logged and surface as empty results or `false`.
//!
//! # Example
//!
//! ```rust,ignore
//! use maestro::config::ConfigLoader;
//! use maestro::events::ConsoleSink;
//! use maestro::Maestro;
//!
//! let config = ConfigLoader::new().load().await?;
//! let maestro = Maestro::from_config(&config)?;
//! let outcome = maestro.handle_text("play some jazz", &ConsoleSink).await;
//! assert!(outcome.success);
//! ```

pub mod adapters;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod intent;
pub mod playlist;
pub mod resolver;
pub mod router;
pub mod track;

pub use adapters::{MopidyClient, MusicServer, VideoSearch, YouTubeClient};
pub use config::{ConfigLoader, MaestroConfig};
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use error::{MaestroError, Result};
pub use events::{Event, EventSink};
pub use intent::{Action, Intent, IntentParameters};
pub use playlist::{Playlist, PlaylistRegistry};
pub use resolver::{classify, Classification, IntentResolver};
pub use router::{build_oracle, ChatMessage, Maestro};
pub use track::Track;

/// Crate version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
