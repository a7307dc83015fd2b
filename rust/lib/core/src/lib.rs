pub mod config;
pub mod error;
pub mod module;

pub use config::ServiceConfig;
pub use error::GatewayError;
pub use module::Module;
