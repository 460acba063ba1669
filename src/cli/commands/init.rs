//! `ferney init` — create the key, master password record, and empty table.

use crate::cli::output;
use crate::cli::{prompt_new_master_password, resolve_paths, Cli};
use crate::errors::{FerneyError, Result};
use crate::vault::{Vault, VaultState};

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (settings, paths) = resolve_paths(cli)?;

    // 1. Refuse to touch an existing vault before asking for anything.
    match Vault::state(&paths) {
        VaultState::Uninitialized => {}
        VaultState::Initialized | VaultState::Partial => {
            output::tip("Use `ferney add` to store credentials in the existing vault.");
            return Err(FerneyError::VaultAlreadyExists(paths.dir));
        }
    }

    let dir_existed = paths.dir.exists();

    // 2. Prompt for the master password (with confirmation).
    let password = prompt_new_master_password(settings.min_password_length)?;

    // 3. Create key, table, and master record.
    let vault = Vault::init(paths, &password)?;

    if !dir_existed {
        output::info(&format!(
            "Created vault directory: {}",
            vault.dir().display()
        ));
    }
    output::success(&format!("Vault created at {}", vault.dir().display()));

    output::tip("Run `ferney add` to store a credential.");
    output::tip("Run `ferney view <TITLE>` to reveal one.");

    Ok(())
}
