//! Spreadsheet export of group and manifest records.
//!
//! Workbooks are built in memory; the caller decides where the bytes go.

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::{
    error::DResult,
    formatter::{GroupRecord, ManifestRecord},
};

const DATE_COLUMN: &str = "Date";
const PERSON_COLUMN_WIDTH: f64 = 40.0;
const COLUMN_WIDTH: f64 = 18.0;

enum CellValue<'a> {
    Text(&'a str),
    Count(usize),
}

trait SheetRow {
    /// Every column except "Date", which is only written when a row has one.
    const COLUMNS: &'static [&'static str];

    fn values(&self) -> Vec<CellValue<'_>>;

    fn date(&self) -> Option<&str>;
}

impl SheetRow for GroupRecord {
    const COLUMNS: &'static [&'static str] = &[
        "Pickup Person",
        "Pickup time",
        "Pickup Location",
        "Number of People",
    ];

    fn values(&self) -> Vec<CellValue<'_>> {
        vec![
            CellValue::Text(&self.pickup_person),
            CellValue::Text(&self.pickup_time),
            CellValue::Text(&self.pickup_location),
            CellValue::Count(self.number_of_people),
        ]
    }

    fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }
}

impl SheetRow for ManifestRecord {
    const COLUMNS: &'static [&'static str] = &[
        "Pickup Person",
        "Pickup time",
        "Pickup Location",
        "Number of People",
        "Car Plate",
        "Mobile",
    ];

    fn values(&self) -> Vec<CellValue<'_>> {
        vec![
            CellValue::Text(&self.pickup_person),
            CellValue::Text(&self.pickup_time),
            CellValue::Text(&self.pickup_location),
            CellValue::Count(self.number_of_people),
            CellValue::Text(&self.car_plate),
            CellValue::Text(&self.mobile),
        ]
    }

    fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }
}

fn write_sheet<R: SheetRow>(sheet: &mut Worksheet, name: &str, rows: &[R]) -> DResult<()> {
    sheet.set_name(name)?;

    let header_format = Format::new().set_bold();
    // Manifest passenger cells hold one line per stop.
    let text_format = Format::new().set_text_wrap();

    let with_date = rows.iter().any(|row| row.date().is_some());
    let mut headers = R::COLUMNS.to_vec();
    if with_date {
        headers.push(DATE_COLUMN);
    }

    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (index, row) in rows.iter().enumerate() {
        let line = index as u32 + 1;
        for (col, value) in row.values().into_iter().enumerate() {
            match value {
                CellValue::Text(text) => {
                    sheet.write_string_with_format(line, col as u16, text, &text_format)?;
                }
                CellValue::Count(count) => {
                    sheet.write_number(line, col as u16, count as f64)?;
                }
            }
        }
        if with_date {
            sheet.write_string(line, R::COLUMNS.len() as u16, row.date().unwrap_or_default())?;
        }
    }

    // Approximate widths; the passenger column carries the long text.
    sheet.set_column_width(0, PERSON_COLUMN_WIDTH)?;
    for col in 1..headers.len() {
        sheet.set_column_width(col as u16, COLUMN_WIDTH)?;
    }
    Ok(())
}

/// All pickup groups on a single "Pickup Groups" sheet.
pub fn groups_workbook(records: &[GroupRecord]) -> DResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    write_sheet(workbook.add_worksheet(), "Pickup Groups", records)?;
    Ok(workbook.save_to_buffer()?)
}

/// One vehicle's manifest on a "Pickup Info" sheet, for a per-driver file.
pub fn manifest_workbook(record: &ManifestRecord) -> DResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    write_sheet(
        workbook.add_worksheet(),
        "Pickup Info",
        std::slice::from_ref(record),
    )?;
    Ok(workbook.save_to_buffer()?)
}

/// Every manifest in one workbook, one "Group N" sheet per vehicle.
pub fn manifests_workbook(records: &[ManifestRecord]) -> DResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    for (index, record) in records.iter().enumerate() {
        write_sheet(
            workbook.add_worksheet(),
            &format!("Group {}", index + 1),
            std::slice::from_ref(record),
        )?;
    }
    Ok(workbook.save_to_buffer()?)
}

/// File name for the `index`-th (0-based) manifest download.
pub fn manifest_file_name(index: usize) -> String {
    format!("pickup_info_group_{}.xlsx", index + 1)
}
