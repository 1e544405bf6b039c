//! External command execution (`wget`, `unzip`).

use colored::Colorize;
use regex::Regex;
use std::error::Error;
use std::process::Command;
use std::sync::OnceLock;

/// Regex for splitting command strings while preserving quoted substrings.
static COMMAND_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_command_regex() -> &'static Regex {
    COMMAND_REGEX.get_or_init(|| {
        Regex::new(r#"'([^']*)'\s*|\"([^\"]*)\"\s*|([^'\s]*)\s*"#).expect("Invalid Regex")
    })
}

/// Run a command and return its combined stdout and stderr.
///
/// The command string is split on spaces, with quoted substrings kept
/// together, so paths containing spaces must be quoted.
pub fn run(cmd: &str) -> Result<String, Box<dyn Error>> {
    log::info!("Running command: {cmd}", cmd = cmd.on_blue());

    let cmds: Vec<&str> = split_and_strip(cmd);
    log::trace!("split cmds={:?}", cmds);

    let (program, args) = cmds.split_first().ok_or("Empty command")?;
    let output = Command::new(program).args(args).output().map_err(|e| {
        log::error!("Command execution failed: {}", e);
        format!("could not execute command: {cmd} - error: {e}")
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    if !output.status.success() {
        log::trace!(
            "code={code:?}, status={status}\n┎######\nstderr=\n{stderr}\n┖######",
            code = output.status.code(),
            status = output.status,
            stderr = stderr.red()
        );
        log::warn!(
            "{failed} to run {cmd}",
            failed = "failed".on_red(),
            cmd = cmd.on_blue()
        );
        return Err(format!("could not execute command: {cmd} - {stderr}").into());
    }

    log::debug!("Success cmd: {cmd} status={:?}", output.status.code());
    Ok(format!("{stdout}{stderr}"))
}

/// Split a command string on spaces, preserving quoted substrings.
fn split_and_strip(input: &str) -> Vec<&str> {
    get_command_regex()
        .find_iter(input)
        .map(|m| m.as_str().trim().trim_matches('\'').trim_matches('"'))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Wrap `arg` in single quotes so [`run`] keeps it as one argument.
pub fn quote(arg: &str) -> String {
    format!("'{arg}'")
}
