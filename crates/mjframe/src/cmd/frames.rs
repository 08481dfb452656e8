use std::fs;

use serde::Serialize;
use tracing::debug;

use mjframe_codec::{ContainerConfig, ContainerReader};

use crate::cmd::FramesArgs;
use crate::exit::{codec_error, io_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{new_table, print_json, OutputFormat};

#[derive(Serialize)]
struct RecordRow {
    index: usize,
    offset: usize,
    header_width: usize,
    len: usize,
    markers_ok: bool,
}

#[derive(Serialize)]
struct FramesOutput<'a> {
    file: String,
    total_frames: usize,
    total_bytes: usize,
    limited: bool,
    records: &'a [RecordRow],
}

pub fn run(args: FramesArgs, format: OutputFormat) -> CliResult<i32> {
    let config = match args.max_frame_len {
        Some(0) => {
            return Err(CliError::new(
                USAGE,
                "--max-frame-len must be greater than zero",
            ))
        }
        Some(max) => ContainerConfig { max_frame_len: max },
        None => ContainerConfig::default(),
    };

    let file = fs::File::open(&args.file)
        .map_err(|err| io_error(&format!("failed to open {}", args.file.display()), err))?;
    let mut reader = ContainerReader::with_config(file, config);

    let mut records = Vec::new();
    let mut limited = false;

    loop {
        if let Some(limit) = args.limit {
            if records.len() >= limit {
                limited = true;
                break;
            }
        }

        let offset = reader.position();
        match reader.read_frame() {
            Ok(Some(frame)) => {
                let consumed = reader.position() - offset;
                records.push(RecordRow {
                    index: records.len(),
                    offset,
                    header_width: consumed - frame.len(),
                    len: frame.len(),
                    markers_ok: frame.has_jpeg_markers(),
                });
            }
            Ok(None) => break,
            Err(err) => {
                // Show what was read before the container went bad.
                print_records(&args, &records, reader.position(), limited, format);
                return Err(codec_error(
                    &format!("failed reading {}", args.file.display()),
                    err,
                ));
            }
        }
    }
    debug!(frames = records.len(), "container listing complete");

    print_records(&args, &records, reader.position(), limited, format);
    Ok(SUCCESS)
}

fn print_records(
    args: &FramesArgs,
    records: &[RecordRow],
    total_bytes: usize,
    limited: bool,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Json => {
            print_json(&FramesOutput {
                file: args.file.display().to_string(),
                total_frames: records.len(),
                total_bytes,
                limited,
                records,
            });
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["#", "OFFSET", "HEADER", "BYTES", "JPEG"]);
            for record in records {
                table.add_row(vec![
                    record.index.to_string(),
                    record.offset.to_string(),
                    format!("{} digits", record.header_width),
                    record.len.to_string(),
                    if record.markers_ok { "ok" } else { "bad" }.to_string(),
                ]);
            }
            println!("{table}");
            print_summary(records, total_bytes, limited);
        }
        OutputFormat::Pretty => {
            for record in records {
                println!(
                    "frame {} at offset {}: {} bytes ({}-digit header, markers {})",
                    record.index,
                    record.offset,
                    record.len,
                    record.header_width,
                    if record.markers_ok { "ok" } else { "missing" }
                );
            }
            print_summary(records, total_bytes, limited);
        }
        OutputFormat::Raw => {
            for record in records {
                println!("{}", record.len);
            }
        }
    }
}

fn print_summary(records: &[RecordRow], total_bytes: usize, limited: bool) {
    let suffix = if limited { " (limit reached)" } else { "" };
    println!(
        "{} frame(s), {} container bytes{}",
        records.len(),
        total_bytes,
        suffix
    );
}
