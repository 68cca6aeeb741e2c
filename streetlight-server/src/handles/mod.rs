mod analytics_handle;
mod auth_handle;
mod setting_handle;
mod sse_handle;
mod streetlight_handle;

pub use analytics_handle::*;
pub use auth_handle::*;
pub use setting_handle::*;
pub use sse_handle::*;
pub use streetlight_handle::*;
