//! `ferney add` — encrypt a password and append a credential.

use std::io::{self, IsTerminal, Read};

use dialoguer::{Confirm, Input};
use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{open_unlocked, Cli};
use crate::errors::{FerneyError, Result};
use crate::vault::NewCredential;

/// Fields passed on the command line; `None` means "prompt for it".
#[derive(Default)]
pub struct AddArgs<'a> {
    pub title: Option<&'a str>,
    pub site: Option<&'a str>,
    pub username: Option<&'a str>,
    pub notes: Option<&'a str>,
}

/// Execute the `add` command.
///
/// When no title was passed on the command line, keeps offering to add
/// another credential until the user declines.
pub fn execute(cli: &Cli, mut args: AddArgs<'_>) -> Result<()> {
    let tty = io::stdin().is_terminal();
    if args.title.is_none() && !tty {
        return Err(FerneyError::CommandFailed(
            "--title is required when stdin is not a terminal".into(),
        ));
    }

    let vault = open_unlocked(cli)?;
    let interactive = args.title.is_none();

    loop {
        let credential = NewCredential {
            title: field(args.title, "Title", tty)?,
            site: field(args.site, "Website/App", tty)?,
            username: field(args.username, "Username", tty)?,
            password: read_password(tty)?,
            notes: field(args.notes, "Notes", tty)?,
        };

        let record = vault.add_credential(credential)?;
        output::success(&format!("Credential '{}' added", record.title));

        if !interactive || !confirm_another()? {
            break;
        }
        args = AddArgs::default();
    }

    Ok(())
}

/// Use the command-line value if given, otherwise prompt (empty allowed).
///
/// Without a terminal there is nobody to prompt, so the field is empty.
fn field(value: Option<&str>, prompt: &str, tty: bool) -> Result<String> {
    match value {
        Some(v) => Ok(v.to_string()),
        None if !tty => Ok(String::new()),
        None => Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| FerneyError::CommandFailed(format!("{prompt} prompt: {e}"))),
    }
}

/// Read the credential's password from piped stdin or a hidden prompt.
fn read_password(tty: bool) -> Result<Zeroizing<String>> {
    if !tty {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = buf.trim_end_matches(['\r', '\n']).len();
        buf.truncate(trimmed);
        return Ok(buf);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Password")
        .interact()
        .map_err(|e| FerneyError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

fn confirm_another() -> Result<bool> {
    Confirm::new()
        .with_prompt("Add another credential?")
        .default(false)
        .interact()
        .map_err(|e| FerneyError::CommandFailed(format!("failed to read confirmation: {e}")))
}
