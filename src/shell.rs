//! The shell-exec bridge: spawning detached child processes for the `RUN`
//! action family. Children are never waited on; the event loop reaps them
//! via `SIGCHLD` rather than blocking (see §5 "Suspension points").
use crate::error::Result;
use std::io::Read;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Run `command` through `sh -c`, detached, with stdout/stderr discarded.
/// Used for plain `RUN` actions.
pub fn run(command: &str) -> Result<()> {
    debug!(%command, "spawning subprocess");
    Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(())
}

/// Run `command` through `sh -c` and capture its first line of stdout, for
/// `SHOW-MESSAGE-RUN`. Blocks the calling thread until the child exits, so
/// callers must only use this from contexts that tolerate a brief stall
/// (never from the main event loop directly).
pub fn run_and_capture_one_line(command: &str) -> Result<String> {
    debug!(%command, "spawning subprocess for output");
    let mut child = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()?;

    let mut buf = String::new();
    if let Some(mut stdout) = child.stdout.take() {
        if let Err(e) = stdout.read_to_string(&mut buf) {
            warn!(%command, error = %e, "failed to read subprocess output");
        }
    }
    child.wait()?;

    Ok(buf.lines().next().unwrap_or("").to_string())
}
