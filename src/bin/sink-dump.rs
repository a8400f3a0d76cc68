//! Offline reader for sink record files.
//!
//! Decodes back-to-back CBOR envelope records from files (or stdin)
//! and prints them as JSON, one object per line, or indented with
//! `--pretty`. `text/*` payloads print as strings, `application/json`
//! payloads are parsed and inlined, everything else prints the way
//! serde_json renders byte arrays. A decode error (including a
//! truncated trailing record) ends the stream.

use clap::Parser;
use ingest_sink::record::{Envelope, EnvelopeError};
use serde_json::json;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "sink-dump", version, about = "Pretty-print sink record files")]
struct Cli {
    /// Pretty print JSON.
    #[arg(long)]
    pretty: bool,

    /// Record files to read; stdin when empty.
    files: Vec<PathBuf>,
}

/// Render one record as JSON, inlining printable payloads.
fn render(rec: &Envelope) -> serde_json::Value {
    let data = if rec.content_type.starts_with("text/") {
        json!(String::from_utf8_lossy(&rec.payload))
    } else if rec.content_type.starts_with("application/json") {
        serde_json::from_slice(&rec.payload).unwrap_or_else(|_| json!(rec.payload.clone()))
    } else {
        json!(rec.payload.clone())
    };
    json!({
        "t": rec.when_millis,
        "d": data,
        "Content-Type": rec.content_type,
    })
}

/// Decode and print records until end-of-stream.
fn dump<R: Read>(mut reader: R, pretty: bool) -> Result<(), EnvelopeError> {
    loop {
        let rec = match Envelope::decode_from(&mut reader) {
            Ok(rec) => rec,
            Err(e) if Envelope::is_end_of_stream(&e) => return Ok(()),
            Err(e) => return Err(e),
        };
        let rendered = render(&rec);
        if pretty {
            println!("{:#}", rendered);
        } else {
            println!("{}", rendered);
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut failed = false;

    if cli.files.is_empty() {
        let stdin = std::io::stdin();
        if let Err(e) = dump(stdin.lock(), cli.pretty) {
            eprintln!("stdin: {}", e);
            failed = true;
        }
    } else {
        for path in &cli.files {
            let file = match File::open(path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("{}: {}", path.display(), e);
                    failed = true;
                    continue;
                }
            };
            if let Err(e) = dump(BufReader::new(file), cli.pretty) {
                eprintln!("{}: {}", path.display(), e);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
