//! `columndb-server`: accepts one client at a time over a local Unix
//! domain socket, translates each line it sends into a `DbOperator`, and
//! runs it against a process-wide [`columndb_engine::Catalog`].
//!
//! One socket, a stale-socket-file `unlink` before bind, and a blocking
//! accept loop that serves a connection to completion before taking the
//! next. No threads; sessions are served one at a time.

mod parser;
mod protocol;

use std::fs;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use columndb_engine::error::StatusCode;
use columndb_engine::{executor, persistence, Catalog, ExecutionOutcome, Session};
use log::{error, info, warn};
use structopt::StructOpt;

use protocol::Message;

/// Accepts statements over a local stream socket and executes them
/// against a columnar catalog.
#[derive(StructOpt, Debug)]
struct Cli {
    /// Verbose mode (-v, -vv, -vvv, etc)
    #[structopt(short = "v", long, parse(from_occurrences))]
    verbose: usize,
    /// Path of the Unix domain socket to listen on.
    #[structopt(long, default_value = "columndb.sock")]
    socket: PathBuf,
    /// Root directory under which the catalog and column data are
    /// persisted at shutdown and rehydrated at startup.
    // Matches `columndb_engine::DEFAULT_DATA_DIR`; structopt's
    // `default_value` must be a string literal, not an expression.
    #[structopt(long, default_value = "db_data")]
    data_dir: PathBuf,
}

fn main() -> Result<()> {
    let opt = Cli::from_args();

    stderrlog::new()
        .module(module_path!())
        .quiet(false)
        .verbosity(opt.verbose)
        .timestamp(stderrlog::Timestamp::Second)
        .init()?;

    let mut catalog = Catalog::new();
    info!("starting database from {:?}", opt.data_dir);
    persistence::startup(&mut catalog, &opt.data_dir).context("failed to load database from storage")?;

    let listener = setup_server(&opt.socket)?;
    info!("waiting for a connection on {:?}", opt.socket);

    loop {
        let (stream, _) = listener.accept().context("failed to accept a new connection")?;
        let shutdown_requested = handle_client(stream, &mut catalog);
        if shutdown_requested {
            break;
        }
    }

    info!("shutting down database");
    persistence::shutdown(&catalog, &opt.data_dir).context("failed to shut down database")?;
    let _ = fs::remove_file(&opt.socket);
    Ok(())
}

fn setup_server(socket_path: &Path) -> Result<UnixListener> {
    info!("attempting to setup server...");
    // A prior run's socket file may still be on disk if the process was
    // killed without reaching the shutdown cleanup; remove it before
    // binding, mirroring setup_server's `unlink`.
    let _ = fs::remove_file(socket_path);
    UnixListener::bind(socket_path).with_context(|| format!("failed to bind {socket_path:?}"))
}

/// Serves one connection to completion. Returns whether the client issued
/// `shutdown`.
fn handle_client(stream: UnixStream, catalog: &mut Catalog) -> bool {
    info!("connected to socket");
    let mut session = Session::new();
    let mut writer = match stream.try_clone() {
        Ok(w) => w,
        Err(e) => {
            error!("failed to clone client socket: {e}");
            return false;
        }
    };
    let mut reader = stream;
    let mut shutdown_requested = false;

    loop {
        let request = match Message::read_from(&mut reader) {
            Ok(Some(m)) => m,
            Ok(None) => break,
            Err(e) => {
                error!("client connection closed: {e}");
                break;
            }
        };
        let statement = match String::from_utf8(request.payload) {
            Ok(s) => s,
            Err(_) => {
                warn!("received non-UTF8 statement payload");
                continue;
            }
        };

        let response = dispatch(&statement, catalog, &mut session, &mut shutdown_requested);
        if let Err(e) = response.write_to(&mut writer) {
            error!("server failed to send message: {e}");
            break;
        }
        if shutdown_requested {
            break;
        }
    }

    info!("connection closed");
    shutdown_requested
}

fn dispatch(
    statement: &str,
    catalog: &mut Catalog,
    session: &mut Session,
    shutdown_requested: &mut bool,
) -> Message {
    let operator = match parser::parse_line(statement) {
        Ok(Some(op)) => op,
        Ok(None) => return Message::status_only(StatusCode::OkDone),
        Err(e) => {
            warn!("{}", e.message);
            return Message::status_only(e.status);
        }
    };

    match executor::execute(operator, catalog, session) {
        Ok(ExecutionOutcome::Done) => Message::status_only(StatusCode::OkDone),
        Ok(ExecutionOutcome::Response(body)) => Message::new(StatusCode::OkWaitForResponse, body),
        Ok(ExecutionOutcome::Shutdown) => {
            *shutdown_requested = true;
            Message::status_only(StatusCode::OkDone)
        }
        Err(e) => {
            warn!("{e}");
            Message::status_only(e.status())
        }
    }
}
