//! Prints the argon2 hash of a password for the `auth.users` config list.

use std::io::{self, BufRead};

use anyhow::{Context, anyhow};
use streetlight_server::services::Argon2Credentials;

fn main() -> anyhow::Result<()> {
    let password = match std::env::args().nth(1) {
        Some(password) => password,
        None => {
            let mut line = String::new();
            io::stdin()
                .lock()
                .read_line(&mut line)
                .context("Failed to read password from stdin")?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    if password.is_empty() {
        return Err(anyhow!("usage: streetlight-passwd <password>  (or pipe it on stdin)"));
    }

    let hash = Argon2Credentials::hash(&password).map_err(|e| anyhow!("Failed to hash password: {}", e))?;
    println!("{hash}");

    Ok(())
}
