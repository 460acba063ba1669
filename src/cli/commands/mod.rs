//! One module per subcommand; each exposes an `execute` function.

pub mod add;
pub mod init;
pub mod list;
pub mod view;
