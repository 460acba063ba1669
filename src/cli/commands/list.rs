//! `ferney list` — display every credential without its password.

use crate::cli::output;
use crate::cli::{open_unlocked, Cli};
use crate::errors::{FerneyError, Result};

/// Execute the `list` command.
pub fn execute(cli: &Cli, json: bool) -> Result<()> {
    let vault = open_unlocked(cli)?;
    let credentials = vault.list_credentials()?;

    if json {
        let rendered = serde_json::to_string_pretty(&credentials)
            .map_err(|e| FerneyError::CommandFailed(format!("JSON output: {e}")))?;
        println!("{rendered}");
        return Ok(());
    }

    output::info(&format!("{} credential(s)", credentials.len()));
    output::print_credentials_table(&credentials);

    Ok(())
}
