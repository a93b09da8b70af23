//! `rotalog` binary.
//!
//! Usage:
//!   some-daemon 2>&1 | rotalog --file /var/log/daemon.log --rolling date --max-backups 7
//!   rotalog --file app.log --at warn "disk almost full"
//!   rotalog --config logging.toml --stdout

use clap::Parser;
use rotalog::cli::{Cli, run};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    run(&cli)
}
