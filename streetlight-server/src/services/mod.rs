mod auth_service;
mod cache_service;
mod command_service;
mod refresh_service;
mod snapshot_service;
mod token_service;

pub use auth_service::*;
pub use cache_service::*;
pub use command_service::*;
pub use refresh_service::*;
pub use snapshot_service::*;
pub use token_service::*;
