//! `columndb-client`: connects to `columndb-server`'s socket and relays
//! statements read from a script file, or interactively from stdin,
//! printing each response's payload (if any) to stdout.
//!
//! A thin relay with no query logic of its own; kept minimal.

mod protocol;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{info, warn};
use structopt::StructOpt;

use protocol::Message;

/// Interactive and scripted client for columndb-server.
#[derive(StructOpt, Debug)]
struct Cli {
    /// Verbose mode (-v, -vv, -vvv, etc)
    #[structopt(short = "v", long, parse(from_occurrences))]
    verbose: usize,
    /// Path of the server's Unix domain socket to connect to.
    #[structopt(long, default_value = "columndb.sock")]
    socket: PathBuf,
    /// A script of statements to run, one per line. If omitted, reads
    /// statements interactively from stdin until EOF.
    script: Option<PathBuf>,
}

fn main() -> Result<()> {
    let opt = Cli::from_args();

    stderrlog::new()
        .module(module_path!())
        .quiet(false)
        .verbosity(opt.verbose)
        .timestamp(stderrlog::Timestamp::Second)
        .init()?;

    let stream = UnixStream::connect(&opt.socket)
        .with_context(|| format!("failed to connect to {:?}", opt.socket))?;
    info!("connected to {:?}", opt.socket);

    let lines: Box<dyn BufRead> = match &opt.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("failed to open {path:?}"))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    run(stream, lines)
}

fn run(mut stream: UnixStream, lines: Box<dyn BufRead>) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in lines.lines() {
        let line = line.context("failed to read statement")?;
        if line.trim().is_empty() {
            continue;
        }

        Message::request(&line)
            .write_to(&mut stream)
            .context("failed to send statement")?;
        let response = Message::read_from(&mut stream).context("failed to read response")?;

        if !response.status.is_ok() {
            warn!("{}", response.status);
        }
        if !response.payload.is_empty() {
            out.write_all(&response.payload)?;
        }

        if line.trim() == "shutdown" {
            break;
        }
    }

    Ok(())
}
