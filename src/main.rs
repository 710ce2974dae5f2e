//! careprint – command-line record → PDF exporter.
//!
//! Usage:
//!   careprint <record.json> [output-dir]
//!   careprint --sample <visit|prescription> [output-dir]
//!
//! The record JSON carries a `kind` tag (`visit` or `prescription`) and
//! camelCase fields. The PDF lands in the output directory (default `.`)
//! under the record's suggested filename.

use std::{env, fs, path::PathBuf, process};

use careprint::{samples, Exporter, Notification, Record};

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut input_path: Option<PathBuf> = None;
    let mut output_dir: Option<PathBuf> = None;
    let mut sample: Option<String> = None;
    let mut positional = 0usize;

    let mut iter = args.iter().skip(1).peekable();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--sample" | "-s" => match iter.next() {
                Some(v) => sample = Some(v.clone()),
                None => {
                    eprintln!("--sample requires a value: visit or prescription");
                    process::exit(1);
                }
            },
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown flag: {other}");
                print_usage(&args[0]);
                process::exit(1);
            }
            path => {
                if positional == 0 && sample.is_none() {
                    input_path = Some(PathBuf::from(path));
                } else if output_dir.is_none() {
                    output_dir = Some(PathBuf::from(path));
                } else {
                    eprintln!("Unexpected argument: {path}");
                    print_usage(&args[0]);
                    process::exit(1);
                }
                positional += 1;
            }
        }
    }

    let record: Record = match (&sample, &input_path) {
        (Some(which), _) => match which.as_str() {
            "visit" => samples::sample_visit(),
            "prescription" => samples::sample_prescription(),
            other => {
                eprintln!("Unknown sample '{other}': expected visit or prescription");
                process::exit(1);
            }
        },
        (None, Some(path)) => {
            let json = match fs::read_to_string(path) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Error reading '{}': {e}", path.display());
                    process::exit(1);
                }
            };
            match serde_json::from_str(&json) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Error parsing '{}': {e}", path.display());
                    process::exit(1);
                }
            }
        }
        (None, None) => {
            eprintln!("Error: no record specified.");
            print_usage(&args[0]);
            process::exit(1);
        }
    };

    let dir = output_dir.unwrap_or_else(|| PathBuf::from("."));
    let exporter = Exporter::default();
    eprintln!("{}", Notification::exporting().message);

    let result = exporter.export_to(&record, &dir).await;
    let note = Notification::for_result(&result);
    match result {
        Ok(path) => eprintln!("{} ({})", note.message, path.display()),
        Err(e) => {
            eprintln!("{} ({e})", note.message);
            process::exit(1);
        }
    }
}

fn print_usage(prog: &str) {
    eprintln!("careprint – clinical record to PDF exporter");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {prog} <record.json> [output-dir]");
    eprintln!("  {prog} --sample <visit|prescription> [output-dir]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <record.json>  Record with a `kind` tag (visit|prescription), camelCase fields");
    eprintln!("  [output-dir]   Directory for the PDF (default: current directory)");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --sample, -s   Export a bundled demo record instead of a file");
    eprintln!("  --help         Print this message");
}
