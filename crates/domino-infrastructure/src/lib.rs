//! Infrastructure layer: file-backed persistence, paths and configuration.

pub mod config_service;
pub mod dto;
pub mod memory_session_store;
pub mod paths;
pub mod storage;
pub mod toml_session_store;

pub use crate::config_service::ConfigService;
pub use crate::memory_session_store::InMemorySessionStore;
pub use crate::paths::DominoPaths;
pub use crate::toml_session_store::TomlSessionStore;
