// Excel file import (xlsx, xls, xlsb, ods) and audit report export (xlsx only)
//
// Import: first row of the chosen sheet is the header row; every cell is
//         rendered to text so the engine sees the same shape as a CSV.
// Export: one worksheet per report section, header row bold and frozen.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use printaudit_recon::report::{AuditReport, ReportCell, ReportSection};
use printaudit_recon::Table;
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet};
use tracing::debug;

use crate::error::IoError;

/// Import one sheet of a workbook as a table.
///
/// Without `sheet`, the first sheet in workbook order is read.
pub fn import(path: &Path, sheet: Option<&str>) -> Result<Table, IoError> {
    let workbook_err = |message: String| IoError::Workbook {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook: Sheets<_> =
        open_workbook_auto(path).map_err(|e| workbook_err(e.to_string()))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let sheet_name = match sheet {
        Some(wanted) => sheet_names
            .iter()
            .find(|name| name.as_str() == wanted)
            .cloned()
            .ok_or_else(|| IoError::MissingSheet {
                path: path.to_path_buf(),
                sheet: wanted.to_string(),
            })?,
        None => sheet_names.first().cloned().ok_or_else(|| IoError::EmptyWorkbook {
            path: path.to_path_buf(),
        })?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| workbook_err(format!("cannot read sheet '{}': {}", sheet_name, e)))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(row) => row.iter().map(cell_text).collect(),
        None => {
            return Err(IoError::Empty {
                path: path.to_path_buf(),
            })
        }
    };

    let rows: Vec<Vec<String>> = rows
        .map(|row| row.iter().map(cell_text).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|v| !v.trim().is_empty()))
        .collect();

    debug!(path = %path.display(), sheet = %sheet_name, rows = rows.len(), "workbook imported");
    Ok(Table::new(headers, rows))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            // Format nicely: integers without decimals
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => format!("{}", n),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::Error(e) => format!("#{:?}", e),
        // Serial number; the date parser in finance understands it
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

/// Write the audit report as an XLSX workbook.
pub fn write_report(report: &AuditReport, path: &Path) -> Result<(), IoError> {
    let export_err = |message: String| IoError::Export {
        path: path.to_path_buf(),
        message,
    };

    let mut xlsx_workbook = XlsxWorkbook::new();
    let header_format = Format::new().set_bold();

    for section in &report.sections {
        let worksheet = xlsx_workbook
            .add_worksheet()
            .set_name(&section.name)
            .map_err(|e| export_err(format!("cannot create sheet '{}': {}", section.name, e)))?;

        write_section(worksheet, section, &header_format)
            .map_err(|e| export_err(format!("sheet '{}': {}", section.name, e)))?;
    }

    xlsx_workbook
        .save(path)
        .map_err(|e| export_err(e.to_string()))?;

    debug!(path = %path.display(), sections = report.sections.len(), "report written");
    Ok(())
}

fn write_section(
    worksheet: &mut Worksheet,
    section: &ReportSection,
    header_format: &Format,
) -> Result<(), rust_xlsxwriter::XlsxError> {
    for (col, name) in section.columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, name, header_format)?;
    }

    for (idx, row) in section.rows.iter().enumerate() {
        let row_num = (idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                ReportCell::Text(s) => {
                    worksheet.write_string(row_num, col, s)?;
                }
                ReportCell::Number(n) => {
                    worksheet.write_number(row_num, col, *n)?;
                }
                ReportCell::Empty => {}
            }
        }
    }

    worksheet.set_freeze_panes(1, 0)?;
    worksheet.autofit();
    Ok(())
}
