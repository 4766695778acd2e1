//! Open links in the system's default browser.

use std::io;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Escape the characters `cmd.exe` treats as operators so `start` receives
/// the whole URL.
fn cmd_escape(url: &str) -> String {
    let mut escaped = String::with_capacity(url.len());
    for c in url.chars() {
        if matches!(c, '^' | '&' | '|' | '<' | '>') {
            escaped.push('^');
        }
        escaped.push(c);
    }
    escaped
}

/// Single-quoted PowerShell string literal.
fn powershell_quote(url: &str) -> String {
    format!("'{}'", url.replace('\'', "''"))
}

/// The launcher commands to try for `url`, in order.
///
/// - Windows: `cmd /c start "" <url>`, then PowerShell `Start-Process`
/// - Elsewhere: `xdg-open <url>`, then `open <url>` (macOS)
pub fn launch_commands(url: &str) -> Vec<Command> {
    if cfg!(target_os = "windows") {
        let mut start = Command::new("cmd");
        start.args(["/c", "start", "", &cmd_escape(url)]);
        let mut powershell = Command::new("powershell");
        powershell.args([
            "-NoProfile",
            "-Command",
            &format!("Start-Process {}", powershell_quote(url)),
        ]);
        vec![start, powershell]
    } else {
        let mut xdg = Command::new("xdg-open");
        xdg.arg(url);
        let mut open = Command::new("open");
        open.arg(url);
        vec![xdg, open]
    }
}

/// Spawn `command` with null stdio and wait for it on a background thread,
/// so the launcher never lingers as a zombie.
fn spawn_detached(command: &mut Command) -> io::Result<JoinHandle<()>> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(thread::spawn(move || {
        if let Err(e) = child.wait() {
            debug!(error = %e, "Failed to reap launcher");
        }
    }))
}

/// Spawn the first launcher that starts for `url`. Failures are logged only.
pub fn open_url(url: &str) {
    for mut command in launch_commands(url) {
        match spawn_detached(&mut command) {
            Ok(_) => {
                debug!(%url, program = ?command.get_program(), "Opened link");
                return;
            }
            Err(e) => {
                debug!(%url, program = ?command.get_program(), error = %e, "Launcher failed");
            }
        }
    }
    warn!(%url, "No browser launcher could be started");
}
