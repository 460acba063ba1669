//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::{CredentialSummary, RevealedCredential};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print one credential, password included.
pub fn print_credential(credential: &RevealedCredential) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec!["Title", credential.title.as_str()]);
    table.add_row(vec!["Password", credential.password.as_str()]);
    table.add_row(vec!["Website/App", credential.site.as_str()]);
    table.add_row(vec!["Username", credential.username.as_str()]);
    table.add_row(vec!["Notes", credential.notes.as_str()]);

    println!("{table}");
}

/// Print a table of credentials (Title, Website/App, Username).
pub fn print_credentials_table(credentials: &[CredentialSummary]) {
    if credentials.is_empty() {
        info("No credentials in this vault yet.");
        tip("Run `ferney add` to store your first credential.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Title", "Website/App", "Username"]);

    for c in credentials {
        table.add_row(vec![c.title.clone(), c.site.clone(), c.username.clone()]);
    }

    println!("{table}");
}
