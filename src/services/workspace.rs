use std::path::{Path, PathBuf};
use std::process::Command;

use super::Workspace;
use crate::error::{Error, Result};

#[derive(Default)]
pub struct SystemWorkspace;

impl Workspace for SystemWorkspace {
    fn desktop_dir(&self) -> Option<PathBuf> {
        dirs::desktop_dir()
    }

    fn reveal(&self, path: &Path) -> Result<()> {
        let mut command = reveal_command(path);
        let status = command.status()?;
        if !status.success() {
            return Err(Error::Io(std::io::Error::other(format!(
                "{:?} exited with {}",
                command.get_program(),
                status
            ))));
        }
        Ok(())
    }
}

#[cfg(target_os = "macos")]
fn reveal_command(path: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg("-R").arg(path);
    command
}

#[cfg(not(target_os = "macos"))]
fn reveal_command(path: &Path) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(path.parent().unwrap_or(path));
    command
}

/// Open a directory in the OS file browser.
pub fn open_dir(dir: &Path) -> Result<()> {
    let program = if cfg!(target_os = "macos") { "open" } else { "xdg-open" };
    Command::new(program).arg(dir).spawn()?;
    Ok(())
}
