use clap::Parser;
use dataset_card::{Config, CsvLoader, ReportOptions, SummaryOptions, logging, run};
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about = "Print an ID card for a CSV dataset.", long_about = None)]
struct Args {
    /// CSV file to summarize
    path: PathBuf,

    /// Count distinct values per column
    #[arg(long)]
    distinct: bool,

    /// List value frequencies per column
    #[arg(long)]
    frequencies: bool,

    /// Same as --distinct --frequencies
    #[arg(long)]
    extended: bool,

    /// Show at most N values per column in the frequency block
    #[arg(long, value_name = "N")]
    top: Option<usize>,

    /// Interior width of each frame (at least 40)
    #[arg(long, default_value_t = 40, value_parser = clap::value_parser!(u64).range(40..))]
    width: u64,

    /// Field delimiter, a single ASCII character or "tab"
    #[arg(short, long, default_value = ",", value_parser = parse_delimiter)]
    delimiter: u8,

    /// Extra cell text to read as a missing value
    #[arg(long = "na-value", value_name = "TOKEN")]
    na_values: Vec<String>,

    /// More log output on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        _ => Err(format!("expected a single ASCII character, got {s:?}")),
    }
}

impl Args {
    fn config(&self) -> Config {
        Config {
            summary: SummaryOptions {
                include_distinct_counts: self.distinct || self.extended,
                include_value_frequencies: self.frequencies || self.extended,
            },
            report: ReportOptions {
                width: usize::try_from(self.width).unwrap_or(usize::MAX),
                max_frequency_entries: self.top,
            },
        }
    }

    fn loader(&self) -> CsvLoader {
        self.na_values
            .iter()
            .fold(CsvLoader::new().with_delimiter(self.delimiter), |loader, token| {
                loader.with_na_value(token.clone())
            })
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match run(&args.loader(), &args.path, &args.config(), &mut out) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(?err, "run failed");
            eprintln!("dataset-card: {err}");
            ExitCode::FAILURE
        }
    }
}
