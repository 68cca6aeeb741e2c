mod analytics;
mod auth;
mod control;
mod settings;
mod streetlight;

pub use analytics::*;
pub use auth::*;
pub use control::*;
pub use settings::*;
pub use streetlight::*;

/// Device identifier, the key the realtime database assigns to a streetlight.
pub type StreetlightId = alloc::string::String;
