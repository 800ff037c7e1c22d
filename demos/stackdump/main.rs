//! Print the elements of a slice file, or the summary of a series.
//!
//! ```none
//! cargo run --example stackdump -- <FILE.dcm | DIRECTORY> [-v]
//! ```
use dicom_stack::{dump_file, Diagnostics, ReaderOptions};
use std::env;
use std::path::PathBuf;
use std::process;
use tracing::Level;

fn main() {
    let mut verbose = false;
    let mut target = None;
    for arg in env::args_os().skip(1) {
        if arg == "-v" || arg == "--verbose" {
            verbose = true;
        } else {
            target = Some(PathBuf::from(arg));
        }
    }
    let target = match target {
        Some(target) => target,
        None => {
            eprintln!("Usage: stackdump <FILE.dcm | DIRECTORY> [-v]");
            process::exit(2);
        }
    };

    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(if verbose { Level::DEBUG } else { Level::WARN })
            .with_writer(std::io::stderr)
            .finish(),
    )
    .unwrap_or_else(|e| eprintln!("[ERROR] could not set up logging: {}", e));

    let options = ReaderOptions::new();
    if target.is_dir() {
        let report = match options.read_directory(&target) {
            Ok(report) => report,
            Err(e) => {
                eprintln!("[ERROR] {}", e);
                process::exit(1);
            }
        };
        for slice in &report.volume {
            let meta = slice.metadata();
            let spacing = meta
                .pixel_spacing
                .map(|(r, c)| format!("{} x {}", r, c))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{}: {} x {} samples, spacing {}",
                slice.path().display(),
                meta.rows.unwrap_or(0),
                meta.columns.unwrap_or(0),
                spacing
            );
        }
        for (path, e) in &report.skipped {
            println!("{}: skipped ({})", path.display(), e);
        }
        match report.volume.dim() {
            Some([n, rows, columns]) => println!("Volume: {} x {} x {}", n, rows, columns),
            None => println!("Volume: {} slices of mixed dimensions", report.volume.len()),
        }
    } else {
        let mut diagnostics = Diagnostics::for_file(&target);
        match dump_file(&target, &options, &mut diagnostics) {
            Ok(entries) => {
                for entry in entries {
                    println!("{} {} {}", entry.tag, entry.vr, entry.value);
                }
            }
            Err(e) => {
                eprintln!("[ERROR] {}", e);
                process::exit(1);
            }
        }
        println!("({} diagnostics)", diagnostics.len());
    }
}
