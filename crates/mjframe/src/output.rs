use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// Print a report as a single JSON line.
pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

/// Table with the preset shared by all table-mode printers.
pub fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Leading bytes as spaced hex pairs, e.g. "FF D8 FF FE".
pub fn hex_preview(data: &[u8], limit: usize) -> String {
    data.iter()
        .take(limit)
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Leading bytes as printable ASCII, with dots for everything else.
pub fn ascii_preview(data: &[u8], limit: usize) -> String {
    data.iter()
        .take(limit)
        .map(|&b| if (0x20..0x7F).contains(&b) { b as char } else { '.' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_preview_is_spaced_and_limited() {
        let data = [0xFF, 0xD8, 0x00, 0x41];
        assert_eq!(hex_preview(&data, 3), "FF D8 00");
        assert_eq!(hex_preview(&data, 16), "FF D8 00 41");
        assert_eq!(hex_preview(&[], 4), "");
    }

    #[test]
    fn ascii_preview_masks_non_printable() {
        let data = [b'0', b'6', 0xFF, b'A', 0x00];
        assert_eq!(ascii_preview(&data, 5), "06.A.");
    }
}
