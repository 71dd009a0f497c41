use log::{debug, info, warn};

use rollcall_tally::builder::Dataset;
use rollcall_tally::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use text_diff::print_diff;

use crate::args::Args;
use crate::report::config_reader::*;
use crate::report::io_csv::{CsvSink, CsvSource};
use crate::report::io_xlsx::XlsxSource;

mod config_reader;
mod io_common;
mod io_csv;
mod io_xlsx;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ReportError {
    #[snafu(display("Input source {path} could not be found. Please make sure that it exists."))]
    InputSourceMissing { path: String },
    #[snafu(display("Error opening file {path}: {source}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of {path}: {source}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Line {lineno} of {path} is too short"))]
    RowTooShort { path: String, lineno: usize },
    #[snafu(display("Missing column {column} in {path}"))]
    MissingColumn { path: String, column: String },
    #[snafu(display("Line {lineno} of {path}: field {field} should be an integer, found {value:?}"))]
    MalformedField {
        path: String,
        lineno: usize,
        field: String,
        value: String,
    },
    #[snafu(display("Error opening workbook {path}: {source}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Worksheet {sheet} of {path} is empty"))]
    EmptyExcel { path: String, sheet: String },
    #[snafu(display("Line {lineno} of {path}: could not read field {field} from cell {content}"))]
    ExcelWrongCellType {
        path: String,
        lineno: usize,
        field: String,
        content: String,
    },
    #[snafu(display("Error opening configuration {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing configuration {path}: {source}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Could not find the folder of {path}"))]
    MissingParentDir { path: String },
    #[snafu(display("Unknown input type {input_type:?} (expected csv or xlsx)"))]
    UnknownInputType { input_type: String },
    #[snafu(display("Could not create the output folder {path}"))]
    CreatingOutputDir {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing report {path}"))]
    CsvWrite { source: csv::Error, path: String },
    #[snafu(display("Error writing report {path}"))]
    WritingReport {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Could not remove the previous report {path}"))]
    RemovingStaleReport {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Could not generate the {report} report: {source}"))]
    Tally {
        source: TallyErrors,
        report: String,
    },
    #[snafu(display("Error opening reference file {path}"))]
    OpeningReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Difference detected between the generated reports and the reference: {files}"))]
    ReferenceMismatch { files: String },
}

pub type ReportResult<T> = Result<T, ReportError>;

/// A store that provides the four tables, fully read.
pub trait DataSource {
    fn fetch_bills(&self) -> ReportResult<Vec<Bill>>;
    fn fetch_legislators(&self) -> ReportResult<Vec<Legislator>>;
    fn fetch_votes(&self) -> ReportResult<Vec<Vote>>;
    fn fetch_vote_results(&self) -> ReportResult<Vec<VoteResult>>;
}

impl DataSource for Dataset {
    fn fetch_bills(&self) -> ReportResult<Vec<Bill>> {
        Ok(self.bills.clone())
    }

    fn fetch_legislators(&self) -> ReportResult<Vec<Legislator>> {
        Ok(self.legislators.clone())
    }

    fn fetch_votes(&self) -> ReportResult<Vec<Vote>> {
        Ok(self.votes.clone())
    }

    fn fetch_vote_results(&self) -> ReportResult<Vec<VoteResult>> {
        Ok(self.vote_results.clone())
    }
}

/// A destination for summary rows.
///
/// The header is derived from the field names of the rows. Persisting no rows
/// does nothing.
pub trait ReportSink {
    fn persist<R: Serialize>(&self, rows: &[R], destination: &str) -> ReportResult<()>;
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct LegislatorRow {
    pub id: LegislatorId,
    pub name: String,
    pub num_supported_bills: u64,
    pub num_opposed_bills: u64,
}

impl From<&LegislatorSummary> for LegislatorRow {
    fn from(s: &LegislatorSummary) -> LegislatorRow {
        LegislatorRow {
            id: s.id,
            name: s.name.clone(),
            num_supported_bills: s.num_supported_bills,
            num_opposed_bills: s.num_opposed_bills,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct BillRow {
    pub id: BillId,
    pub title: String,
    pub supporter_count: u64,
    pub opposer_count: u64,
    pub primary_sponsor: String,
}

impl From<&BillSummary> for BillRow {
    fn from(s: &BillSummary) -> BillRow {
        BillRow {
            id: s.id,
            title: s.title.clone(),
            supporter_count: s.supporter_count,
            opposer_count: s.opposer_count,
            primary_sponsor: s.primary_sponsor.clone(),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Reports {
    pub legislators: Vec<LegislatorRow>,
    pub bills: Vec<BillRow>,
}

/// Reads all the tables before anything gets tallied.
pub fn load_dataset(source: &dyn DataSource) -> ReportResult<Dataset> {
    let data = Dataset {
        bills: source.fetch_bills()?,
        legislators: source.fetch_legislators()?,
        votes: source.fetch_votes()?,
        vote_results: source.fetch_vote_results()?,
    };
    info!(
        "load_dataset: {:?} bills, {:?} legislators, {:?} votes, {:?} vote results",
        data.bills.len(),
        data.legislators.len(),
        data.votes.len(),
        data.vote_results.len()
    );
    Ok(data)
}

/// Runs both tallies. Either both succeed or nothing is returned.
pub fn generate_reports(data: &Dataset) -> ReportResult<Reports> {
    let legislators = data.legislator_report().context(TallySnafu {
        report: "legislators",
    })?;
    let bills = data.bill_report().context(TallySnafu { report: "bills" })?;
    Ok(Reports {
        legislators: legislators.iter().map(LegislatorRow::from).collect(),
        bills: bills.iter().map(BillRow::from).collect(),
    })
}

pub fn write_reports<S: ReportSink>(
    sink: &S,
    reports: &Reports,
    settings: &RunSettings,
) -> ReportResult<()> {
    sink.persist(&reports.legislators, &settings.legislator_report_file)?;
    sink.persist(&reports.bills, &settings.bill_report_file)?;
    Ok(())
}

fn read_report_text(path: &Path) -> ReportResult<String> {
    let contents = fs::read_to_string(path).context(OpeningReferenceSnafu {
        path: path.display().to_string(),
    })?;
    // The reference files may come from tools that use other line endings.
    Ok(contents.replace("\r\n", "\n").trim_end().to_string())
}

/// Compares each generated report with the file of the same name in `reference_dir`.
///
/// A report that was not written (nothing to report) compares as an empty file.
pub fn check_reference(
    reference_dir: &Path,
    output_dir: &Path,
    file_names: &[&str],
) -> ReportResult<()> {
    let mut mismatches: Vec<String> = Vec::new();
    for name in file_names {
        let expected = read_report_text(&reference_dir.join(name))?;
        let generated_p: PathBuf = output_dir.join(name);
        let generated = if generated_p.is_file() {
            read_report_text(&generated_p)?
        } else {
            String::new()
        };
        debug!("check_reference: {:?}: {:?}", name, generated);
        if expected != generated {
            warn!("Found differences with the reference file {}", name);
            print_diff(expected.as_str(), generated.as_str(), "\n");
            mismatches.push(name.to_string());
        }
    }
    ensure!(
        mismatches.is_empty(),
        ReferenceMismatchSnafu {
            files: mismatches.join(", ")
        }
    );
    Ok(())
}

pub fn run_reports(args: &Args) -> ReportResult<()> {
    let settings = run_settings(args)?;
    info!("settings: {:?}", settings);

    let source: Box<dyn DataSource> = match settings.input_type {
        InputType::Csv => Box::new(CsvSource::new(&settings.input_path, &settings.tables)),
        InputType::Xlsx => Box::new(XlsxSource::open(&settings.input_path)?),
    };
    let data = load_dataset(source.as_ref())?;
    let reports = generate_reports(&data)?;

    let sink = CsvSink::new(&settings.output_folder);
    write_reports(&sink, &reports, &settings)?;

    if let Some(reference_p) = &args.reference {
        check_reference(
            Path::new(reference_p),
            &settings.output_folder,
            &[
                settings.legislator_report_file.as_str(),
                settings.bill_report_file.as_str(),
            ],
        )?;
    }

    println!(
        "Reports generated: {} legislators, {} bills in {}",
        reports.legislators.len(),
        reports.bills.len(),
        settings.output_folder.display()
    );
    Ok(())
}
