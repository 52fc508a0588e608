use crate::domain::model::{CsvRow, ItemId};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_delimiter, validate_encoding_label};
use encoding_rs::{Encoding, SHIFT_JIS, UTF_8};
use std::borrow::Cow;

/// How uploaded order files are read.
#[derive(Debug, Clone, Copy)]
pub struct CsvOptions {
    pub encoding: &'static Encoding,
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            encoding: SHIFT_JIS,
            delimiter: b',',
        }
    }
}

impl CsvOptions {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Ok(Self {
            encoding: validate_encoding_label("import.encoding", config.encoding_label())?,
            delimiter: validate_delimiter("import.delimiter", config.delimiter())?,
        })
    }
}

/// Splits raw file bytes into rows, header included.
pub fn decode_csv(bytes: &[u8], options: CsvOptions) -> Vec<CsvRow> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => {
            if encoding != options.encoding {
                tracing::debug!(
                    "Byte order mark overrides configured encoding {} with {}",
                    options.encoding.name(),
                    encoding.name()
                );
            }
            (encoding, &bytes[bom_len..])
        }
        None => (options.encoding, bytes),
    };

    // ASCII 相容的編碼可以直接在位元組上切欄位，其他的先整個轉成 UTF-8
    let (source, field_encoding): (Cow<'_, [u8]>, &'static Encoding) = if encoding.is_ascii_compatible() {
        (Cow::Borrowed(body), encoding)
    } else {
        let (text, had_errors) = encoding.decode_without_bom_handling(body);
        if had_errors {
            tracing::warn!(
                "Input contains byte sequences that are not valid {}; replaced with U+FFFD",
                encoding.name()
            );
        }
        (Cow::Owned(text.into_owned().into_bytes()), UTF_8)
    };

    let mut rows = Vec::new();
    for (line, raw) in split_records(&source).into_iter().enumerate() {
        let row = if raw.is_empty() {
            CsvRow::Fields(vec![String::new()])
        } else {
            parse_record(raw, options.delimiter, field_encoding, line + 1)
        };
        rows.push(row);
    }
    rows
}

/// Cuts the body at unquoted `\n` (a preceding `\r` is dropped).
///
/// Blank lines stay as empty records. A final line terminator only closes
/// the last record; it does not open another one.
fn split_records(body: &[u8]) -> Vec<&[u8]> {
    let mut records = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;

    for (index, byte) in body.iter().enumerate() {
        match byte {
            b'"' => in_quotes = !in_quotes,
            b'\n' if !in_quotes => {
                records.push(trim_cr(&body[start..index]));
                start = index + 1;
            }
            _ => {}
        }
    }
    if start < body.len() {
        records.push(trim_cr(&body[start..]));
    }
    records
}

fn trim_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn parse_record(raw: &[u8], delimiter: u8, encoding: &'static Encoding, line: usize) -> CsvRow {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(raw);

    let mut record = csv::ByteRecord::new();
    match reader.read_byte_record(&mut record) {
        Ok(true) => decode_record(&record, encoding).unwrap_or_else(|| {
            tracing::warn!(
                "Row {} is not valid {}; importing it as a blank order",
                line,
                encoding.name()
            );
            CsvRow::Malformed
        }),
        Ok(false) => CsvRow::Fields(vec![String::new()]),
        Err(e) => {
            tracing::warn!("Row {} could not be read: {}", line, e);
            CsvRow::Malformed
        }
    }
}

fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Option<CsvRow> {
    record
        .iter()
        .map(|field| {
            encoding
                .decode_without_bom_handling_and_without_replacement(field)
                .map(Cow::into_owned)
        })
        .collect::<Option<Vec<String>>>()
        .map(CsvRow::Fields)
}

/// Drops the header row and joins each remaining row's fields with `,`.
///
/// A malformed row still produces an (empty) order so that the pool keeps
/// one entry per data row.
pub fn orders_from_rows(rows: &[CsvRow]) -> Vec<ItemId> {
    rows.iter()
        .skip(1)
        .map(|row| match row {
            CsvRow::Fields(fields) => ItemId::new(fields.join(",")),
            CsvRow::Malformed => ItemId::new(""),
        })
        .collect()
}

pub fn ingest_csv(bytes: &[u8], options: CsvOptions) -> Vec<ItemId> {
    let rows = decode_csv(bytes, options);
    let orders = orders_from_rows(&rows);
    tracing::debug!("Parsed {} rows into {} orders", rows.len(), orders.len());
    orders
}
