use std::fs;

use serde::Serialize;
use tracing::debug;

use mjframe_codec::{convert, header_for, ConvertOutcome, ConvertReport, MAX_PREFIXED_LEN};

use crate::cmd::ConvertArgs;
use crate::exit::{codec_error, io_error, CliResult, SUCCESS};
use crate::output::{ascii_preview, new_table, print_json, OutputFormat};

/// How many per-frame lines the text reports list before eliding.
const FRAME_PREVIEW_LIMIT: usize = 5;

#[derive(Serialize)]
struct HeaderOut {
    width: usize,
    declared_len: usize,
    preferred_width: bool,
    frame_starts_with_soi: bool,
}

#[derive(Serialize)]
struct TailOut {
    offset: usize,
    len: usize,
}

#[derive(Serialize)]
struct OversizedOut {
    index: usize,
    len: usize,
}

#[derive(Serialize)]
struct NoopOutput {
    input: String,
    already_prefixed: bool,
    header_preview: String,
}

#[derive(Serialize)]
struct ConvertOutput {
    input: String,
    output: String,
    input_len: usize,
    output_len: usize,
    frame_count: usize,
    frame_sizes: Vec<usize>,
    oversized: Vec<OversizedOut>,
    truncated_tail: Option<TailOut>,
    header: Option<HeaderOut>,
}

pub fn run(args: ConvertArgs, format: OutputFormat) -> CliResult<i32> {
    let data = fs::read(&args.input)
        .map_err(|err| io_error(&format!("failed to read {}", args.input.display()), err))?;
    debug!(input_len = data.len(), "read input file");

    let outcome = convert(&data)
        .map_err(|err| codec_error(&format!("cannot convert {}", args.input.display()), err))?;

    match outcome {
        ConvertOutcome::AlreadyPrefixed => {
            print_noop(&args, &data, format);
            Ok(SUCCESS)
        }
        ConvertOutcome::Converted { container, report } => {
            fs::write(&args.output, &container).map_err(|err| {
                io_error(&format!("failed to write {}", args.output.display()), err)
            })?;
            print_report(&args, &report, format);
            Ok(SUCCESS)
        }
    }
}

fn print_noop(args: &ConvertArgs, data: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            print_json(&NoopOutput {
                input: args.input.display().to_string(),
                already_prefixed: true,
                header_preview: ascii_preview(data, mjframe_codec::HEADER_WIDTH),
            });
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!(
                "{} already has length prefixes (first bytes: \"{}\"), nothing to do",
                args.input.display(),
                ascii_preview(data, mjframe_codec::HEADER_WIDTH)
            );
        }
        OutputFormat::Raw => {}
    }
}

fn print_report(args: &ConvertArgs, report: &ConvertReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            print_json(&convert_output(args, report));
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["FIELD", "VALUE"]);
            table
                .add_row(vec!["input".to_string(), args.input.display().to_string()])
                .add_row(vec!["output".to_string(), args.output.display().to_string()])
                .add_row(vec!["input bytes".to_string(), report.input_len.to_string()])
                .add_row(vec!["output bytes".to_string(), report.output_len.to_string()])
                .add_row(vec!["frames".to_string(), report.frame_count.to_string()]);
            println!("{table}");
            print_warnings(report);
        }
        OutputFormat::Pretty => {
            println!(
                "Converted {} -> {}",
                args.input.display(),
                args.output.display()
            );
            println!("  Input size:  {} bytes", report.input_len);
            println!("  Output size: {} bytes", report.output_len);
            println!("  Frames:      {}", report.frame_count);
            for (i, size) in report
                .frame_sizes
                .iter()
                .take(FRAME_PREVIEW_LIMIT)
                .enumerate()
            {
                println!("  Frame {}: {} bytes (header \"{}\")", i + 1, size, header_for(*size));
            }
            if report.frame_sizes.len() > FRAME_PREVIEW_LIMIT {
                println!(
                    "  ... and {} more frames",
                    report.frame_sizes.len() - FRAME_PREVIEW_LIMIT
                );
            }
            print_verification(report);
            print_warnings(report);
        }
        OutputFormat::Raw => {
            println!("{}", args.output.display());
        }
    }
}

fn print_verification(report: &ConvertReport) {
    let Some(header) = report.header else {
        return;
    };
    let soi = if header.frame_starts_with_soi() { "yes" } else { "no" };
    if header.is_preferred_width() {
        println!(
            "  Verification: first header \"{}\" ({} digits), SOI follows: {}",
            header_for(header.declared_len),
            header.width,
            soi
        );
    } else {
        println!(
            "  Verification: first header is {} digits wide and declares {} bytes, SOI follows: {}",
            header.width, header.declared_len, soi
        );
    }
}

fn print_warnings(report: &ConvertReport) {
    if !report.oversized.is_empty() {
        println!(
            "WARNING: {} frame(s) exceed {} bytes and use wider headers",
            report.oversized.len(),
            MAX_PREFIXED_LEN
        );
        for over in report.oversized.iter().take(FRAME_PREVIEW_LIMIT) {
            println!("  Frame {}: {} bytes", over.index + 1, over.len);
        }
        if report.oversized.len() > FRAME_PREVIEW_LIMIT {
            println!("  ... and {} more", report.oversized.len() - FRAME_PREVIEW_LIMIT);
        }
    }
    if let Some(tail) = report.truncated_tail {
        println!(
            "WARNING: dropped unterminated trailing frame at offset {} ({} bytes)",
            tail.offset, tail.len
        );
    }
}

fn convert_output(args: &ConvertArgs, report: &ConvertReport) -> ConvertOutput {
    ConvertOutput {
        input: args.input.display().to_string(),
        output: args.output.display().to_string(),
        input_len: report.input_len,
        output_len: report.output_len,
        frame_count: report.frame_count,
        frame_sizes: report.frame_sizes.clone(),
        oversized: report
            .oversized
            .iter()
            .map(|o| OversizedOut {
                index: o.index,
                len: o.len,
            })
            .collect(),
        truncated_tail: report.truncated_tail.map(|t| TailOut {
            offset: t.offset,
            len: t.len,
        }),
        header: report.header.map(|h| HeaderOut {
            width: h.width,
            declared_len: h.declared_len,
            preferred_width: h.is_preferred_width(),
            frame_starts_with_soi: h.frame_starts_with_soi(),
        }),
    }
}
