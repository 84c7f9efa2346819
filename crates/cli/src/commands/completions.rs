//! # CLI Completions Command

use clap::Command;
use clap_complete::Shell;

/// Writes completions for `shell` to `out`.
pub fn completions(shell: Shell, cmd: &mut Command, out: &mut dyn std::io::Write) {
    clap_complete::generate(shell, cmd, "expo-leads", out);
}
