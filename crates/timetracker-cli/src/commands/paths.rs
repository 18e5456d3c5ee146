//! Path listing command.

use std::io::Write;

use timetracker_core::AppDir;

use crate::error::ClientResult;

/// Prints the application directory and the files it may hold.
pub fn run<W: Write>(dir: &AppDir, out: &mut W) -> ClientResult<()> {
    writeln!(out, "directory:   {}", dir.root().display())?;
    writeln!(out, "credentials: {}", dir.credentials_path().display())?;
    writeln!(out, "token:       {}", dir.token_path().display())?;
    writeln!(out, "settings:    {}", dir.settings_path().display())?;
    Ok(())
}
