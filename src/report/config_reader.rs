use crate::args::Args;
use crate::report::*;
use snafu::prelude::*;

use serde::{Deserialize, Serialize};

pub const DEFAULT_INPUT_FOLDER: &str = "input";
pub const DEFAULT_OUTPUT_FOLDER: &str = "output";
pub const DEFAULT_WORKBOOK_FILE: &str = "legislative_data.xlsx";
pub const DEFAULT_LEGISLATOR_REPORT_FILE: &str = "legislators-support-oppose-count.csv";
pub const DEFAULT_BILL_REPORT_FILE: &str = "bills.csv";

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct InputSettings {
    pub provider: Option<String>,
    #[serde(rename = "inputFolder")]
    pub input_folder: Option<String>,
    #[serde(rename = "billsFile")]
    pub bills_file: Option<String>,
    #[serde(rename = "legislatorsFile")]
    pub legislators_file: Option<String>,
    #[serde(rename = "votesFile")]
    pub votes_file: Option<String>,
    #[serde(rename = "voteResultsFile")]
    pub vote_results_file: Option<String>,
    // Only for the xlsx provider
    #[serde(rename = "workbookFile")]
    pub workbook_file: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputSettings {
    #[serde(rename = "outputFolder")]
    pub output_folder: Option<String>,
    #[serde(rename = "legislatorReportFile")]
    pub legislator_report_file: Option<String>,
    #[serde(rename = "billReportFile")]
    pub bill_report_file: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportConfig {
    #[serde(rename = "inputSettings", default)]
    pub input_settings: InputSettings,
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Csv,
    Xlsx,
}

impl InputType {
    pub fn parse(input_type: &str) -> ReportResult<InputType> {
        match input_type {
            "csv" => Ok(InputType::Csv),
            "xlsx" | "excel" => Ok(InputType::Xlsx),
            x => UnknownInputTypeSnafu { input_type: x }.fail(),
        }
    }
}

/// The names of the four CSV tables inside the input folder.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TableFiles {
    pub bills: String,
    pub legislators: String,
    pub votes: String,
    pub vote_results: String,
}

impl Default for TableFiles {
    fn default() -> TableFiles {
        TableFiles {
            bills: "bills.csv".to_string(),
            legislators: "legislators.csv".to_string(),
            votes: "votes.csv".to_string(),
            vote_results: "vote_results.csv".to_string(),
        }
    }
}

/// Everything a run needs to know, with all the defaults and overrides applied.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RunSettings {
    pub input_type: InputType,
    /// The folder of the CSV tables, or the workbook.
    pub input_path: PathBuf,
    pub tables: TableFiles,
    pub output_folder: PathBuf,
    pub legislator_report_file: String,
    pub bill_report_file: String,
}

pub fn read_config(path: &str) -> ReportResult<ReportConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read_config: content: {:?}", contents);
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })
}

/// Reads the configuration file, if any, and applies the command line on top of it.
pub fn run_settings(args: &Args) -> ReportResult<RunSettings> {
    let (config, root_p): (ReportConfig, PathBuf) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            info!("config: {:?}", config);
            let root_p = Path::new(config_path)
                .parent()
                .context(MissingParentDirSnafu { path: config_path })?
                .to_path_buf();
            (config, root_p)
        }
        None => (ReportConfig::default(), PathBuf::new()),
    };
    resolve_settings(&config, &root_p, args)
}

fn resolve_settings(config: &ReportConfig, root_p: &Path, args: &Args) -> ReportResult<RunSettings> {
    let input = &config.input_settings;
    let output = &config.output_settings;

    let input_type = match args.input_type.as_ref().or(input.provider.as_ref()) {
        Some(s) => InputType::parse(s.as_str())?,
        None => InputType::Csv,
    };

    let input_folder = root_p.join(
        input
            .input_folder
            .as_deref()
            .unwrap_or(DEFAULT_INPUT_FOLDER),
    );
    let input_path = match (&args.input, input_type) {
        (Some(p), _) => PathBuf::from(p),
        (None, InputType::Csv) => input_folder,
        (None, InputType::Xlsx) => input_folder.join(
            input
                .workbook_file
                .as_deref()
                .unwrap_or(DEFAULT_WORKBOOK_FILE),
        ),
    };

    let defaults = TableFiles::default();
    let tables = TableFiles {
        bills: input.bills_file.clone().unwrap_or(defaults.bills),
        legislators: input
            .legislators_file
            .clone()
            .unwrap_or(defaults.legislators),
        votes: input.votes_file.clone().unwrap_or(defaults.votes),
        vote_results: input
            .vote_results_file
            .clone()
            .unwrap_or(defaults.vote_results),
    };

    let output_folder = match &args.out {
        Some(p) => PathBuf::from(p),
        None => root_p.join(
            output
                .output_folder
                .as_deref()
                .unwrap_or(DEFAULT_OUTPUT_FOLDER),
        ),
    };

    Ok(RunSettings {
        input_type,
        input_path,
        tables,
        output_folder,
        legislator_report_file: output
            .legislator_report_file
            .clone()
            .unwrap_or_else(|| DEFAULT_LEGISLATOR_REPORT_FILE.to_string()),
        bill_report_file: output
            .bill_report_file
            .clone()
            .unwrap_or_else(|| DEFAULT_BILL_REPORT_FILE.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_args() -> Args {
        Args {
            config: None,
            reference: None,
            out: None,
            input: None,
            input_type: None,
            verbose: false,
        }
    }

    #[test]
    fn defaults_without_config() {
        let settings = run_settings(&no_args()).unwrap();
        assert_eq!(settings.input_type, InputType::Csv);
        assert_eq!(settings.input_path, PathBuf::from("input"));
        assert_eq!(settings.output_folder, PathBuf::from("output"));
        assert_eq!(settings.tables, TableFiles::default());
        assert_eq!(
            settings.legislator_report_file,
            "legislators-support-oppose-count.csv"
        );
        assert_eq!(settings.bill_report_file, "bills.csv");
    }

    #[test]
    fn config_relative_to_its_folder() {
        let tmp = TempDir::new().unwrap();
        let config_p = tmp.path().join("run.json");
        fs::write(
            &config_p,
            r#"{
                "inputSettings": {"inputFolder": "new_input", "voteResultsFile": "results.csv"},
                "outputSettings": {"outputFolder": "new_output", "billReportFile": "bill-report.csv"}
            }"#,
        )
        .unwrap();
        let mut args = no_args();
        args.config = Some(config_p.display().to_string());

        let settings = run_settings(&args).unwrap();
        assert_eq!(settings.input_path, tmp.path().join("new_input"));
        assert_eq!(settings.output_folder, tmp.path().join("new_output"));
        assert_eq!(settings.tables.vote_results, "results.csv");
        assert_eq!(settings.tables.bills, "bills.csv");
        assert_eq!(settings.bill_report_file, "bill-report.csv");
        assert_eq!(
            settings.legislator_report_file,
            DEFAULT_LEGISLATOR_REPORT_FILE
        );
    }

    #[test]
    fn command_line_overrides_config() {
        let config: ReportConfig = serde_json::from_str(
            r#"{"inputSettings": {"provider": "csv"}, "outputSettings": {"outputFolder": "o"}}"#,
        )
        .unwrap();
        let mut args = no_args();
        args.input = Some("/data/book.xlsx".to_string());
        args.input_type = Some("xlsx".to_string());
        args.out = Some("/tmp/reports".to_string());

        let settings = resolve_settings(&config, Path::new("/etc"), &args).unwrap();
        assert_eq!(settings.input_type, InputType::Xlsx);
        assert_eq!(settings.input_path, PathBuf::from("/data/book.xlsx"));
        assert_eq!(settings.output_folder, PathBuf::from("/tmp/reports"));
    }

    #[test]
    fn xlsx_workbook_in_input_folder() {
        let config: ReportConfig =
            serde_json::from_str(r#"{"inputSettings": {"provider": "xlsx"}}"#).unwrap();
        let settings = resolve_settings(&config, Path::new("root"), &no_args()).unwrap();
        assert_eq!(settings.input_type, InputType::Xlsx);
        assert_eq!(
            settings.input_path,
            Path::new("root").join("input").join(DEFAULT_WORKBOOK_FILE)
        );
    }

    #[test]
    fn unknown_provider() {
        let mut args = no_args();
        args.input_type = Some("parquet".to_string());
        let res = run_settings(&args);
        assert!(matches!(
            res,
            Err(ReportError::UnknownInputType { input_type }) if input_type == "parquet"
        ));
    }

    #[test]
    fn missing_config_file() {
        let mut args = no_args();
        args.config = Some("/nonexistent/rollcall.json".to_string());
        assert!(matches!(
            run_settings(&args),
            Err(ReportError::OpeningJson { .. })
        ));
    }

    #[test]
    fn bad_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_p = tmp.path().join("run.json");
        fs::write(&config_p, r#"{"inputSettings": 3}"#).unwrap();
        let mut args = no_args();
        args.config = Some(config_p.display().to_string());
        assert!(matches!(
            run_settings(&args),
            Err(ReportError::ParsingJson { .. })
        ));
    }
}
