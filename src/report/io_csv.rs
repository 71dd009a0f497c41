// Primitives for reading and writing CSV files.

use csv::StringRecord;
use snafu::prelude::*;

use crate::report::{
    config_reader::TableFiles,
    io_common::*,
    *,
};

/// Reads each table from its own CSV file inside a folder.
pub struct CsvSource {
    folder: PathBuf,
    files: TableFiles,
}

impl CsvSource {
    pub fn new(folder: &Path, files: &TableFiles) -> CsvSource {
        CsvSource {
            folder: folder.to_path_buf(),
            files: files.clone(),
        }
    }

    fn table_path(&self, file_name: &str) -> PathBuf {
        self.folder.join(file_name)
    }
}

impl DataSource for CsvSource {
    fn fetch_bills(&self) -> ReportResult<Vec<Bill>> {
        read_csv_table(&self.table_path(&self.files.bills), &BILL_COLUMNS, read_bill)
    }

    fn fetch_legislators(&self) -> ReportResult<Vec<Legislator>> {
        read_csv_table(
            &self.table_path(&self.files.legislators),
            &LEGISLATOR_COLUMNS,
            read_legislator,
        )
    }

    fn fetch_votes(&self) -> ReportResult<Vec<Vote>> {
        read_csv_table(&self.table_path(&self.files.votes), &VOTE_COLUMNS, read_vote)
    }

    fn fetch_vote_results(&self) -> ReportResult<Vec<VoteResult>> {
        read_csv_table(
            &self.table_path(&self.files.vote_results),
            &VOTE_RESULT_COLUMNS,
            read_vote_result,
        )
    }
}

struct CsvRow<'a> {
    path: &'a str,
    lineno: usize,
    header: &'a HeaderIndex,
    record: &'a StringRecord,
}

impl CsvRow<'_> {
    fn get(&self, field: &str) -> ReportResult<&str> {
        let idx = self.header.position(field)?;
        self.record.get(idx).context(RowTooShortSnafu {
            path: self.path,
            lineno: self.lineno,
        })
    }
}

impl RawRow for CsvRow<'_> {
    fn int_field(&self, field: &str) -> ReportResult<i64> {
        parse_int(self.get(field)?, self.path, self.lineno, field)
    }

    fn text_field(&self, field: &str) -> ReportResult<String> {
        Ok(self.get(field)?.to_string())
    }
}

fn read_csv_table<T>(
    path: &Path,
    columns: &[&str],
    decode: fn(&dyn RawRow) -> ReportResult<T>,
) -> ReportResult<Vec<T>> {
    ensure_exists(path)?;
    let p = path.display().to_string();
    info!("Attempting to read table {:?}", p);

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .context(CsvOpenSnafu { path: p.as_str() })?;
    let header_record = rdr
        .headers()
        .context(CsvOpenSnafu { path: p.as_str() })?
        .clone();
    let header_names: Vec<&str> = header_record.iter().collect();
    let header = HeaderIndex::new(&p, &header_names);
    header.require(columns)?;

    let mut res: Vec<T> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is the first line.
        let lineno = idx + 2;
        let record = line_r.context(CsvLineParseSnafu {
            path: p.as_str(),
            lineno,
        })?;
        let row = CsvRow {
            path: &p,
            lineno,
            header: &header,
            record: &record,
        };
        res.push(decode(&row)?);
    }
    debug!("read_csv_table: {:?}: {:?} rows", p, res.len());
    Ok(res)
}

/// Writes each report as a CSV file inside a folder.
pub struct CsvSink {
    folder: PathBuf,
}

impl CsvSink {
    pub fn new(folder: &Path) -> CsvSink {
        CsvSink {
            folder: folder.to_path_buf(),
        }
    }
}

impl ReportSink for CsvSink {
    fn persist<R: Serialize>(&self, rows: &[R], destination: &str) -> ReportResult<()> {
        let p = self.folder.join(destination);
        if rows.is_empty() {
            info!("No data to save in {}", destination);
            // A report left over from an earlier run would no longer be correct.
            if p.is_file() {
                warn!("Removing previous report {:?}", p.display());
                fs::remove_file(&p).context(RemovingStaleReportSnafu {
                    path: p.display().to_string(),
                })?;
            }
            return Ok(());
        }
        fs::create_dir_all(&self.folder).context(CreatingOutputDirSnafu {
            path: self.folder.display().to_string(),
        })?;

        let p = p.display().to_string();
        info!("Writing {} rows to {:?}", rows.len(), p);
        let mut wtr = csv::Writer::from_path(&p).context(CsvWriteSnafu { path: p.as_str() })?;
        for r in rows {
            wtr.serialize(r).context(CsvWriteSnafu { path: p.as_str() })?;
        }
        wtr.flush().context(WritingReportSnafu { path: p.as_str() })?;
        Ok(())
    }
}
