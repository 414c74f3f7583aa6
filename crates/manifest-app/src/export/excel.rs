//! Excel export of the summary projection and of archived days

use std::path::Path;

use chrono::NaiveDate;
use manifest_domain::service::SummaryRow;
use manifest_types::{
    Archive, Column, DailyManifest, Error, ManifestRecord, Result, Shift, PLATE_COLUMN_ID,
};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

const COLUMN_WIDTH: f64 = 16.0;

fn excel_err(e: XlsxError) -> Error {
    Error::Excel(e.to_string())
}

/// Export the summary projection to a single "Summary" worksheet
pub fn export_summary(
    columns: &[Column],
    rows: &[SummaryRow],
    date: NaiveDate,
    output_path: &Path,
) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Summary").map_err(excel_err)?;
    sheet
        .write_string_with_format(0, 0, format!("Fleet Summary {}", date), &header_format)
        .map_err(excel_err)?;

    let header_row = 2;
    write_header(sheet, header_row, columns, &["Shift", "Time"], &header_format)?;

    for (i, summary) in rows.iter().enumerate() {
        let row = header_row + 1 + i as u32;
        for (col, column) in columns.iter().enumerate() {
            let mut value = summary.value(&column.id);
            if value.is_empty() && column.id == PLATE_COLUMN_ID {
                value = summary.plate.as_str();
            }
            sheet
                .write_string(row, col as u16, value)
                .map_err(excel_err)?;
        }
        let shift = summary.shift.map(|s| s.label()).unwrap_or("");
        sheet
            .write_string(row, columns.len() as u16, shift)
            .map_err(excel_err)?;
        sheet
            .write_string(row, columns.len() as u16 + 1, &summary.time)
            .map_err(excel_err)?;
    }

    set_widths(sheet, columns.len() + 2)?;
    workbook.save(output_path).map_err(excel_err)?;
    Ok(())
}

/// Export archives, one worksheet per day named by its date. Each shift with
/// records is a block with a title, a header row and a Time column. Archives
/// render with their own column snapshot, falling back to `live_columns`.
pub fn export_archives(
    archives: &[&Archive],
    live_columns: &[Column],
    output_path: &Path,
) -> Result<()> {
    if archives.is_empty() {
        return Err(Error::Excel("No archives to export".to_string()));
    }

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    for archive in archives {
        let columns = archive.columns_or(live_columns);
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(archive.date.format("%Y-%m-%d").to_string())
            .map_err(excel_err)?;
        sheet
            .write_string_with_format(0, 0, format!("Archive {}", archive.date), &header_format)
            .map_err(excel_err)?;

        let mut row = 2;
        for shift in filled_shifts(&archive.data) {
            row = write_shift_block(
                sheet,
                row,
                shift,
                archive.data.bucket(shift),
                columns,
                &header_format,
            )?;
            row += 1;
        }
        set_widths(sheet, columns.len() + 1)?;
    }

    workbook.save(output_path).map_err(excel_err)?;
    Ok(())
}

/// Shifts that have records, in shift order
fn filled_shifts(data: &DailyManifest) -> Vec<Shift> {
    Shift::ALL
        .into_iter()
        .filter(|&s| !data.bucket(s).is_empty())
        .collect()
}

/// Writes one shift block starting at `row`; returns the next free row
fn write_shift_block(
    sheet: &mut Worksheet,
    mut row: u32,
    shift: Shift,
    records: &[ManifestRecord],
    columns: &[Column],
    header_format: &Format,
) -> Result<u32> {
    sheet
        .write_string_with_format(row, 0, shift.label(), header_format)
        .map_err(excel_err)?;
    row += 1;
    write_header(sheet, row, columns, &["Time"], header_format)?;
    row += 1;

    for record in records {
        for (col, column) in columns.iter().enumerate() {
            sheet
                .write_string(row, col as u16, record.value(&column.id))
                .map_err(excel_err)?;
        }
        sheet
            .write_string(row, columns.len() as u16, &record.time)
            .map_err(excel_err)?;
        row += 1;
    }
    Ok(row)
}

fn write_header(
    sheet: &mut Worksheet,
    row: u32,
    columns: &[Column],
    trailing: &[&str],
    header_format: &Format,
) -> Result<()> {
    let labels = columns
        .iter()
        .map(|c| c.label.as_str())
        .chain(trailing.iter().copied());
    for (col, label) in labels.enumerate() {
        sheet
            .write_string_with_format(row, col as u16, label, header_format)
            .map_err(excel_err)?;
    }
    Ok(())
}

fn set_widths(sheet: &mut Worksheet, count: usize) -> Result<()> {
    for col in 0..count {
        sheet
            .set_column_width(col as u16, COLUMN_WIDTH)
            .map_err(excel_err)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn test_export_summary_writes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("summary.xlsx");
        let rows = vec![SummaryRow {
            plate: "ABC-1".to_string(),
            shift: None,
            values: Default::default(),
            time: String::new(),
        }];
        export_summary(&[Column::plate(), Column::driver()], &rows, day(18), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_export_archives_one_sheet_per_day() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("archives.xlsx");
        let a = Archive {
            date: day(16),
            data: DailyManifest::default(),
            columns: Vec::new(),
        };
        let b = Archive {
            date: day(17),
            data: DailyManifest::default(),
            columns: vec![Column::plate()],
        };
        export_archives(&[&b, &a], &[Column::plate(), Column::driver()], &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_empty_shifts_get_no_block() {
        let mut data = DailyManifest::default();
        assert!(filled_shifts(&data).is_empty());

        data.evening.push(ManifestRecord {
            plate: "ABC-1".to_string(),
            ..Default::default()
        });
        data.morning.push(ManifestRecord::default());
        assert_eq!(filled_shifts(&data), vec![Shift::Morning, Shift::Evening]);
    }

    #[test]
    fn test_export_no_archives_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("none.xlsx");
        assert!(matches!(
            export_archives(&[], &[], &path),
            Err(Error::Excel(_))
        ));
        assert!(!path.exists());
    }
}
