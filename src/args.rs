use clap::Parser;

/// This is a tabulation program for legislative roll calls.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file describing where the tables are and where the reports should go.
    /// For more information about the file format, read the manual of the rollcall_tally crate.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (folder path) A folder containing the expected reports. If provided, rollcall will
    /// check that the generated reports match the reference files of the same name.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (folder path) The folder in which the reports are written. Setting this option overrides
    /// the folder that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (folder or file path) The folder containing the CSV tables, or the Excel workbook when the
    /// input type is xlsx. Setting this option overrides what may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
