//! Application layer - Use cases and orchestration

pub mod add;
pub mod build;
pub mod edit;
pub mod init;
pub mod manage_config;
pub mod render;
pub mod view;

pub use add::AddService;
pub use build::BuildService;
pub use edit::{EditService, EditTarget};
pub use manage_config::ConfigService;
pub use render::RenderService;
pub use view::ViewService;
