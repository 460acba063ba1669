//! `ferney view` — decrypt and print a single credential.

use crate::cli::output;
use crate::cli::{open_unlocked, Cli};
use crate::errors::{FerneyError, Result};
use crate::vault::normalize_title;

/// Execute the `view` command.
pub fn execute(cli: &Cli, title: &str, json: bool) -> Result<()> {
    let vault = open_unlocked(cli)?;

    let credential = vault
        .view_credential(title)?
        .ok_or_else(|| FerneyError::RecordNotFound(normalize_title(title)))?;

    if json {
        let value = serde_json::json!({
            "title": credential.title,
            "site": credential.site,
            "username": credential.username,
            "password": credential.password.as_str(),
            "notes": credential.notes,
        });
        let rendered = serde_json::to_string_pretty(&value)
            .map_err(|e| FerneyError::CommandFailed(format!("JSON output: {e}")))?;
        println!("{rendered}");
    } else {
        output::print_credential(&credential);
    }

    Ok(())
}
