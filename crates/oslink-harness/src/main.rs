//! Conformance CLI for the oslink bindings.
//!
//! Exercises the three resource families against the live OS and emits
//! one JSON record per result, so behavior can be diffed across
//! platforms and libc versions.

use clap::{Parser, Subcommand};
use serde::Serialize;

use oslink::{DirStream, FdSet, Library, Timeout, WaitError, last_error, type_name, wait};

#[derive(Debug, Parser)]
#[command(name = "oslink-harness")]
#[command(about = "Conformance CLI for the oslink bindings")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List a directory through the DirStream binding, one JSON line
    /// per entry.
    List {
        /// Directory to iterate.
        #[arg(long)]
        path: String,
    },
    /// Probe a shared object: open it with the named options and
    /// optionally resolve a symbol.
    ProbeLib {
        /// Shared object path or soname.
        #[arg(long)]
        path: String,
        /// dlopen option names (lazy, now, global, local, nodelete,
        /// noload, deepbind).
        #[arg(long, default_value = "now")]
        option: Vec<String>,
        /// Symbol to resolve after a successful open.
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Poll one descriptor for readability with a bounded timeout.
    Poll {
        /// Descriptor to watch.
        #[arg(long, default_value_t = 0)]
        fd: i32,
        /// Timeout in milliseconds; 0 means a non-blocking poll.
        #[arg(long, default_value_t = 0)]
        millis: i64,
    },
}

#[derive(Serialize)]
struct EntryRecord {
    name: String,
    ino: u64,
    kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
}

#[derive(Serialize)]
struct ProbeRecord {
    path: String,
    opened: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    symbol_addr: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    last_error: String,
}

#[derive(Serialize)]
struct PollRecord {
    fd: i32,
    outcome: &'static str,
    ready_count: usize,
}

fn main() -> std::process::ExitCode {
    match run(Cli::parse()) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("oslink-harness: {err}");
            std::process::ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::List { path } => list(&path),
        Command::ProbeLib {
            path,
            option,
            symbol,
        } => probe_lib(&path, &option, symbol.as_deref()),
        Command::Poll { fd, millis } => poll(fd, millis),
    }
}

fn list(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut stream = DirStream::open(path)?;
    while let Some(entry) = stream.next()? {
        let record = EntryRecord {
            name: entry.name.to_string_lossy().into_owned(),
            ino: entry.ino,
            kind: type_name(entry.kind),
            offset: entry.offset,
        };
        println!("{}", serde_json::to_string(&record)?);
    }
    stream.close();
    Ok(())
}

fn probe_lib(
    path: &str,
    options: &[String],
    symbol: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let record = match Library::open(path, options) {
        Ok(mut lib) => {
            let (symbol_addr, error) = match symbol {
                Some(name) => match lib.symbol(name) {
                    Ok(sym) => (Some(sym.addr()), None),
                    Err(err) => (None, Some(err.to_string())),
                },
                None => (None, None),
            };
            let record = ProbeRecord {
                path: path.to_owned(),
                opened: true,
                symbol_addr,
                error,
                last_error: last_error(),
            };
            lib.close();
            record
        }
        Err(err) => ProbeRecord {
            path: path.to_owned(),
            opened: false,
            symbol_addr: None,
            error: Some(err.to_string()),
            last_error: last_error(),
        },
    };
    println!("{}", serde_json::to_string(&record)?);
    Ok(())
}

fn poll(fd: i32, millis: i64) -> Result<(), Box<dyn std::error::Error>> {
    let mut read_set = FdSet::new();
    read_set.set(fd as usize)?;
    let nfds = read_set.highest().map_or(0, |high| high as i32 + 1);

    let result = wait(
        nfds,
        Some(&mut read_set),
        None,
        None,
        Some(Timeout::from_millis(millis)),
    );
    let record = match result {
        Ok(0) => PollRecord {
            fd,
            outcome: "timeout",
            ready_count: 0,
        },
        Ok(n) => PollRecord {
            fd,
            outcome: "ready",
            ready_count: n,
        },
        Err(WaitError::Interrupted) => PollRecord {
            fd,
            outcome: "interrupted",
            ready_count: 0,
        },
        Err(err) => return Err(err.to_string().into()),
    };
    println!("{}", serde_json::to_string(&record)?);
    Ok(())
}
