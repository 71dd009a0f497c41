// Reading the tables from the worksheets of an Excel workbook.

use calamine::{open_workbook, DataType, Reader, Xlsx};
use snafu::prelude::*;
use std::cell::RefCell;
use std::fs::File;
use std::io::BufReader;

use crate::report::{io_common::*, *};

pub const BILLS_SHEET: &str = "bills";
pub const LEGISLATORS_SHEET: &str = "legislators";
pub const VOTES_SHEET: &str = "votes";
pub const VOTE_RESULTS_SHEET: &str = "vote_results";

/// Reads each table from the worksheet of the same name.
///
/// The workbook is opened once, when the source is created.
pub struct XlsxSource {
    path: String,
    workbook: RefCell<Xlsx<BufReader<File>>>,
}

impl XlsxSource {
    pub fn open(path: &Path) -> ReportResult<XlsxSource> {
        ensure_exists(path)?;
        let p = path.display().to_string();
        info!("Attempting to open workbook {:?}", p);
        let workbook: Xlsx<_> =
            open_workbook(path).context(OpeningExcelSnafu { path: p.as_str() })?;
        Ok(XlsxSource {
            path: p,
            workbook: RefCell::new(workbook),
        })
    }

    fn read_sheet<T>(
        &self,
        sheet: &str,
        columns: &[&str],
        decode: fn(&dyn RawRow) -> ReportResult<T>,
    ) -> ReportResult<Vec<T>> {
        let p = self.path.as_str();
        info!("Attempting to read worksheet {:?} of {:?}", sheet, p);

        let wrange = self
            .workbook
            .borrow_mut()
            .worksheet_range(sheet)
            .context(InputSourceMissingSnafu {
                path: format!("{} (worksheet {})", p, sheet),
            })?
            .context(OpeningExcelSnafu { path: p })?;

        let mut rows = wrange.rows();
        let header_row = rows.next().context(EmptyExcelSnafu { path: p, sheet })?;
        let header_names: Vec<String> = header_row.iter().map(header_cell).collect();
        let header = HeaderIndex::new(p, &header_names);
        header.require(columns)?;

        let first_line = first_data_line(wrange.start());
        let mut res: Vec<T> = Vec::new();
        for (idx, cells) in rows.enumerate() {
            let lineno = first_line + idx;
            if cells.iter().all(|c| *c == DataType::Empty) {
                debug!("read_sheet: {:?}: skipping empty row {:?}", sheet, lineno);
                continue;
            }
            let row = XlsxRow {
                path: p,
                lineno,
                header: &header,
                cells,
            };
            res.push(decode(&row)?);
        }
        debug!("read_sheet: {:?}: {:?} rows", sheet, res.len());
        Ok(res)
    }
}

/// The spreadsheet line number of the first row after the header.
///
/// The used range of a sheet does not necessarily start on the first line.
fn first_data_line(range_start: Option<(u32, u32)>) -> usize {
    let header_row = range_start.map(|(row, _)| row as usize).unwrap_or(0);
    // Rows are 0-based in the range, lines are 1-based.
    header_row + 2
}

impl DataSource for XlsxSource {
    fn fetch_bills(&self) -> ReportResult<Vec<Bill>> {
        self.read_sheet(BILLS_SHEET, &BILL_COLUMNS, read_bill)
    }

    fn fetch_legislators(&self) -> ReportResult<Vec<Legislator>> {
        self.read_sheet(LEGISLATORS_SHEET, &LEGISLATOR_COLUMNS, read_legislator)
    }

    fn fetch_votes(&self) -> ReportResult<Vec<Vote>> {
        self.read_sheet(VOTES_SHEET, &VOTE_COLUMNS, read_vote)
    }

    fn fetch_vote_results(&self) -> ReportResult<Vec<VoteResult>> {
        self.read_sheet(VOTE_RESULTS_SHEET, &VOTE_RESULT_COLUMNS, read_vote_result)
    }
}

fn header_cell(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        _ => "".to_string(),
    }
}

struct XlsxRow<'a> {
    path: &'a str,
    lineno: usize,
    header: &'a HeaderIndex,
    cells: &'a [DataType],
}

impl XlsxRow<'_> {
    fn get(&self, field: &str) -> ReportResult<&DataType> {
        let idx = self.header.position(field)?;
        self.cells.get(idx).context(RowTooShortSnafu {
            path: self.path,
            lineno: self.lineno,
        })
    }
}

impl RawRow for XlsxRow<'_> {
    fn int_field(&self, field: &str) -> ReportResult<i64> {
        read_int_cell(self.get(field)?, self.path, self.lineno, field)
    }

    fn text_field(&self, field: &str) -> ReportResult<String> {
        read_text_cell(self.get(field)?, self.path, self.lineno, field)
    }
}

fn read_int_cell(cell: &DataType, path: &str, lineno: usize, field: &str) -> ReportResult<i64> {
    match cell {
        DataType::Int(i) => Ok(*i),
        // Excel stores most numbers as floats.
        DataType::Float(f) if f.fract() == 0.0 && in_i64_range(*f) => Ok(*f as i64),
        DataType::String(s) => parse_int(s, path, lineno, field),
        _ => MalformedFieldSnafu {
            path,
            lineno,
            field,
            value: format!("{:?}", cell),
        }
        .fail(),
    }
}

// i64::MAX is not representable as a float: the upper bound is exclusive.
fn in_i64_range(f: f64) -> bool {
    f >= i64::MIN as f64 && f < i64::MAX as f64
}

fn read_text_cell(cell: &DataType, path: &str, lineno: usize, field: &str) -> ReportResult<String> {
    match cell {
        DataType::String(s) => Ok(s.clone()),
        DataType::Int(i) => Ok(i.to_string()),
        DataType::Float(f) => Ok(f.to_string()),
        DataType::Empty => Ok("".to_string()),
        _ => ExcelWrongCellTypeSnafu {
            path,
            lineno,
            field,
            content: format!("{:?}", cell),
        }
        .fail(),
    }
}
