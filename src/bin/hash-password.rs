//! Print an Argon2 hash for `auth.admin_password_hash`
//!
//! Usage: hash-password <password>

use anyhow::{bail, Context};

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(password) = args.next() else {
        bail!("usage: hash-password <password>");
    };
    if args.next().is_some() {
        bail!("usage: hash-password <password>");
    }

    let hash = hypnos_server::services::auth::hash_password(&password)
        .context("hashing failed")?;
    println!("{}", hash);
    Ok(())
}
