pub mod config;
pub mod error;
pub mod paths;
pub mod shell;
pub mod terminal;
pub mod text;

pub use config::ShellConfig;
pub use error::ShellError;
pub use shell::Shell;
