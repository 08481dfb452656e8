use std::fs;
use std::io::Read;

use serde::Serialize;

use mjframe_codec::markers::{COM, DQT};
use mjframe_codec::{detect_format, probe_header, StreamFormat, HEADER_SCAN_WINDOW};

use crate::cmd::InspectArgs;
use crate::exit::{io_error, CliResult, SUCCESS};
use crate::output::{ascii_preview, hex_preview, new_table, print_json, OutputFormat};

/// Leading bytes read for analysis; covers the header scan window and both
/// marker checks with room to spare.
const ANALYSIS_WINDOW: usize = 100;

/// Printable preview length for the ASCII line.
const ASCII_PREVIEW: usize = 10;

#[derive(Serialize)]
struct HeaderOut {
    width: usize,
    declared_len: usize,
    preferred_width: bool,
    frame_starts_with_soi: bool,
}

#[derive(Serialize)]
struct InspectOutput {
    file: String,
    format: String,
    head_hex: String,
    head_ascii: String,
    header: Option<HeaderOut>,
    marker_after_soi: Option<String>,
}

pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let mut head = Vec::new();
    fs::File::open(&args.file)
        .map_err(|err| io_error(&format!("failed to open {}", args.file.display()), err))?
        .take(ANALYSIS_WINDOW as u64)
        .read_to_end(&mut head)
        .map_err(|err| io_error(&format!("failed to read {}", args.file.display()), err))?;

    let out = analyze(&args, &head);
    print_analysis(&out, format);
    Ok(SUCCESS)
}

fn analyze(args: &InspectArgs, head: &[u8]) -> InspectOutput {
    let classified = detect_format(head);

    let header = match classified {
        StreamFormat::LengthPrefixed => probe_header(head).map(|h| HeaderOut {
            width: h.width,
            declared_len: h.declared_len,
            preferred_width: h.is_preferred_width(),
            frame_starts_with_soi: h.frame_starts_with_soi(),
        }),
        _ => None,
    };

    let marker_after_soi = match classified {
        StreamFormat::RawWithComment | StreamFormat::RawClean if head.len() >= 4 => {
            Some(hex_preview(&head[2..4], 2))
        }
        _ => None,
    };

    InspectOutput {
        file: args.file.display().to_string(),
        format: classified.to_string(),
        head_hex: hex_preview(head, HEADER_SCAN_WINDOW),
        head_ascii: ascii_preview(head, ASCII_PREVIEW),
        header,
        marker_after_soi,
    }
}

fn print_analysis(out: &InspectOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            print_json(out);
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["FIELD", "VALUE"]);
            table
                .add_row(vec!["file".to_string(), out.file.clone()])
                .add_row(vec!["format".to_string(), out.format.clone()])
                .add_row(vec!["head (hex)".to_string(), out.head_hex.clone()])
                .add_row(vec!["head (ascii)".to_string(), out.head_ascii.clone()]);
            if let Some(header) = &out.header {
                table
                    .add_row(vec![
                        "header width".to_string(),
                        header.width.to_string(),
                    ])
                    .add_row(vec![
                        "first frame bytes".to_string(),
                        header.declared_len.to_string(),
                    ])
                    .add_row(vec![
                        "soi after header".to_string(),
                        header.frame_starts_with_soi.to_string(),
                    ]);
            }
            if let Some(marker) = &out.marker_after_soi {
                table.add_row(vec![
                    "marker after soi".to_string(),
                    format!("{} {}", marker, marker_note(marker)),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("File analysis: {}", out.file);
            println!("  First {} bytes (hex): {}", HEADER_SCAN_WINDOW, out.head_hex);
            println!("  First {} bytes (ASCII): \"{}\"", ASCII_PREVIEW, out.head_ascii);
            println!("  Format: {}", format_label(&out.format));
            if let Some(header) = &out.header {
                println!(
                    "  Header: {} digits declaring {} bytes, SOI follows: {}",
                    header.width,
                    header.declared_len,
                    if header.frame_starts_with_soi { "yes" } else { "no" }
                );
                if header.preferred_width && header.frame_starts_with_soi {
                    println!("  Compliant with the 5-digit header format");
                } else {
                    println!("  Does not match the preferred 5-digit header format");
                }
            }
            if let Some(marker) = &out.marker_after_soi {
                println!("  Marker after SOI: {} {}", marker, marker_note(marker));
            }
        }
        OutputFormat::Raw => {
            println!("{}", out.format);
        }
    }
}

fn format_label(slug: &str) -> &'static str {
    match slug {
        "length-prefixed" => "length-prefixed container",
        "raw-with-comment" => "raw MJPEG with leading comment segment",
        "raw-clean" => "raw JPEG/MJPEG without comment",
        _ => "unrecognized",
    }
}

fn marker_note(marker_hex: &str) -> &'static str {
    if marker_hex == hex_pair(COM) {
        "(COM, comment segment)"
    } else if marker_hex == hex_pair(DQT) {
        "(DQT, quantization table)"
    } else {
        ""
    }
}

fn hex_pair(pair: [u8; 2]) -> String {
    hex_preview(&pair, 2)
}
