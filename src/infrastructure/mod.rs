//! Infrastructure layer - External I/O and persistence

pub mod config;
pub mod external;
pub mod renderer;
pub mod repository;
pub mod search;

pub use config::Config;
pub use external::ExternalCommand;
pub use renderer::Renderer;
pub use repository::{Application, ProjectRepository};
pub use search::SearchPath;
