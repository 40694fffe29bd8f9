/// Common test utilities and helpers for starsync integration tests
use std::process::Command;

/// Build a command that runs the starsync binary with the given arguments.
pub fn starsync(args: &[&str]) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["run", "--"]);
    cmd.args(args);
    cmd
}
