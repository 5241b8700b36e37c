use anyhow::Result;
use std::io::Write;

use crate::util::auth::TokenStore;

pub fn run(tokens: &TokenStore, token: &str, out: &mut dyn Write) -> Result<()> {
    let path = tokens.set(token)?;
    writeln!(out, "Token was written into {} successfully.", path.display())?;
    Ok(())
}
