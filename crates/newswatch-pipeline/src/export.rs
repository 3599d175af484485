//! CSV import and export with fixed column contracts.
//!
//! Raw exports carry `Person, Title, Date, Source, Link`; enriched exports
//! carry `Person, Link, Date, Title text`. Import accepts any header that has
//! at least `Person` and `Link`, so either export can be fed back in.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use newswatch_core::SearchResultRecord;

use crate::error::PipelineError;
use crate::table::{Column, ResultTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportLayout {
    Raw,
    Enriched,
}

impl ExportLayout {
    #[must_use]
    pub fn columns(self) -> &'static [Column] {
        match self {
            ExportLayout::Raw => &Column::RAW,
            ExportLayout::Enriched => &Column::ENRICHED,
        }
    }
}

/// Write `table` as CSV in the given layout.
///
/// # Errors
///
/// Returns [`PipelineError::Io`] if writing fails.
pub fn write_csv<W: Write>(
    table: &ResultTable,
    layout: ExportLayout,
    mut writer: W,
) -> Result<(), PipelineError> {
    let columns = layout.columns();
    let header: Vec<&str> = columns.iter().map(|c| c.header()).collect();
    write_row(&mut writer, &header)?;

    for record in table.rows() {
        let fields: Vec<&str> = columns.iter().map(|c| field(record, *c)).collect();
        write_row(&mut writer, &fields)?;
    }
    writer.flush()?;
    Ok(())
}

/// Parse CSV produced by [`write_csv`] (or any file with compatible headers).
///
/// Unrecognized columns are ignored. Empty `Date` and `Title text` cells
/// become `None`.
///
/// # Errors
///
/// - [`PipelineError::MissingColumn`] if `Person` or `Link` is absent.
/// - [`PipelineError::Csv`] for an unterminated quote or a row with more
///   fields than the header.
/// - [`PipelineError::Io`] if reading fails.
pub fn read_csv<R: Read>(mut reader: R) -> Result<ResultTable, PipelineError> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    let input = input.strip_prefix('\u{feff}').unwrap_or(&input);

    let mut rows = parse_rows(input)?.into_iter();
    let Some((_, header)) = rows.next() else {
        return Err(PipelineError::MissingColumn(Column::Person.header()));
    };

    let mapping: Vec<Option<Column>> = header
        .iter()
        .map(|name| {
            let column = Column::from_header(name.trim());
            if column.is_none() {
                tracing::debug!(column = %name, "ignoring unrecognized column");
            }
            column
        })
        .collect();
    for required in [Column::Person, Column::Link] {
        if !mapping.contains(&Some(required)) {
            return Err(PipelineError::MissingColumn(required.header()));
        }
    }

    let mut records = Vec::new();
    for (line, fields) in rows {
        if fields.len() > mapping.len() {
            return Err(PipelineError::Csv {
                line,
                reason: format!(
                    "expected at most {} fields, found {}",
                    mapping.len(),
                    fields.len()
                ),
            });
        }
        let mut record = SearchResultRecord::default();
        for (column, value) in mapping.iter().zip(fields) {
            if let Some(column) = column {
                set_field(&mut record, *column, value);
            }
        }
        records.push(record);
    }

    let columns: Vec<Column> = mapping.into_iter().flatten().collect();
    Ok(ResultTable::with_columns(records, columns))
}

/// # Errors
///
/// Returns [`PipelineError::FileIo`] if the file cannot be created, or
/// [`PipelineError::Io`] if writing fails.
pub fn export_to_path(
    table: &ResultTable,
    layout: ExportLayout,
    path: &Path,
) -> Result<(), PipelineError> {
    let file = fs::File::create(path).map_err(|source| PipelineError::FileIo {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(table, layout, std::io::BufWriter::new(file))?;
    tracing::info!(path = %path.display(), rows = table.len(), ?layout, "table exported");
    Ok(())
}

/// # Errors
///
/// Returns [`PipelineError::FileIo`] if the file cannot be opened, otherwise
/// the same errors as [`read_csv`].
pub fn import_from_path(path: &Path) -> Result<ResultTable, PipelineError> {
    let file = fs::File::open(path).map_err(|source| PipelineError::FileIo {
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_csv(file)?;
    tracing::info!(path = %path.display(), rows = table.len(), "table imported");
    Ok(table)
}

fn field(record: &SearchResultRecord, column: Column) -> &str {
    match column {
        Column::Person => &record.person,
        Column::Title => &record.title,
        Column::Date => record.date.as_deref().unwrap_or_default(),
        Column::Source => &record.source,
        Column::Link => &record.link,
        Column::BodyText => record.body_text.as_deref().unwrap_or_default(),
    }
}

fn set_field(record: &mut SearchResultRecord, column: Column, value: String) {
    let optional = |v: String| (!v.trim().is_empty()).then_some(v);
    match column {
        Column::Person => record.person = value,
        Column::Title => record.title = value,
        Column::Date => record.date = optional(value),
        Column::Source => record.source = value,
        Column::Link => record.link = value,
        Column::BodyText => record.body_text = optional(value),
    }
}

fn write_row<W: Write>(writer: &mut W, fields: &[&str]) -> std::io::Result<()> {
    let line = fields
        .iter()
        .map(|f| escape(f))
        .collect::<Vec<_>>()
        .join(",");
    writeln!(writer, "{line}")
}

fn escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Split CSV text into rows of fields, tagged with the 1-based line each row starts on.
/// Blank lines are skipped.
fn parse_rows(input: &str) -> Result<Vec<(usize, Vec<String>)>, PipelineError> {
    let mut rows = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut line = 1usize;
    let mut row_start = 1usize;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    current.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    current.push(c);
                }
                _ => current.push(c),
            }
            continue;
        }

        match c {
            '"' if current.is_empty() => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut current)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                fields.push(std::mem::take(&mut current));
                if !(fields.len() == 1 && fields[0].is_empty()) {
                    rows.push((row_start, std::mem::take(&mut fields)));
                }
                fields.clear();
                line += 1;
                row_start = line;
            }
            _ => current.push(c),
        }
    }

    if in_quotes {
        return Err(PipelineError::Csv {
            line: row_start,
            reason: "unterminated quoted field".to_string(),
        });
    }
    if !current.is_empty() || !fields.is_empty() {
        fields.push(current);
        rows.push((row_start, fields));
    }
    Ok(rows)
}
