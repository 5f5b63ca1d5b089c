//! 命令定义和实现

pub mod config;
pub mod devices;
pub mod run;

pub use config::ConfigCommand;
pub use devices::DevicesCommand;
pub use run::RunCommand;
