//! Report parsing core for vpncmd tabular output
//!
//! vpncmd prints reports as `Label | Value` lines surrounded by banners and
//! blank lines. This module turns that text into structured records in three
//! layers: line splitting ([`line`]), record assembly ([`assemble`]) and
//! field normalization ([`normalize`]). All of it is pure; nothing here
//! retains state between invocations.

pub mod assemble;
pub mod line;
pub mod normalize;

pub use assemble::{assemble_record, ListAssembler, ListLayout, Record, RecordLayout, RecordSet};
pub use line::report_pairs;
pub use normalize::{extract_error_code, normalize_timestamp, parse_byte_count};

/// Table-header label vpncmd repeats at the top of every record
pub const TABLE_HEADER_KEY: &str = "Item";
