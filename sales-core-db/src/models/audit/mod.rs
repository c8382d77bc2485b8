pub mod system_log;

pub use system_log::*;
