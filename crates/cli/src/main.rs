// rcv - terminal viewer for accounting reconciliation reports

mod api;
mod exit_codes;
mod export_cmd;
mod submit;
mod summary;
mod tui;
mod upload;
mod util;

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use reconview_report::paginate::PageSize;
use reconview_report::{DiffTable, Report, ReportError};

use api::ApiError;
use exit_codes::{api_exit_code, EXIT_ERROR, EXIT_IO, EXIT_REPORT_PARSE, EXIT_SUCCESS, EXIT_USAGE};
use export_cmd::{DirectionArg, SortByArg, StatusArg};

#[derive(Parser)]
#[command(name = "rcv")]
#[command(about = "Terminal viewer for accounting reconciliation reports")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse a report's differences table interactively
    #[command(after_help = "\
Examples:
  rcv view report.json
  rcv view report.json --plain
  cat report.json | rcv view -")]
    View {
        /// Report JSON file (use - for stdin)
        report: PathBuf,

        /// Print the table once instead of opening the interactive viewer
        #[arg(long)]
        plain: bool,

        /// Rows per page: 10, 20, 50 or 100
        #[arg(long, value_parser = parse_page_size)]
        rows: Option<PageSize>,
    },

    /// Print a report's headline numbers
    #[command(after_help = "\
Examples:
  rcv summary report.json
  rcv summary report.json --json
  cat report.json | rcv summary -")]
    Summary {
        /// Report JSON file (use - for stdin)
        report: PathBuf,

        /// Machine-readable output
        #[arg(long)]
        json: bool,
    },

    /// Export the differences table to CSV
    #[command(after_help = "\
Examples:
  rcv export report.json
  rcv export report.json --status divergent -o divergent.csv
  rcv export report.json --search acme --sort-by difference --direction asc")]
    Export {
        /// Report JSON file (use - for stdin)
        report: PathBuf,

        /// Keep only rows with this status
        #[arg(long, value_enum, default_value_t = StatusArg::All)]
        status: StatusArg,

        /// Search term matched against code and client name
        #[arg(long)]
        search: Option<String>,

        /// Sort column
        #[arg(long, value_enum, default_value_t = SortByArg::AbsoluteDifference)]
        sort_by: SortByArg,

        /// Sort direction
        #[arg(long, value_enum, default_value_t = DirectionArg::Desc)]
        direction: DirectionArg,

        /// Output file (default: diferencas_<today>.csv)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Suppress the confirmation message
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Upload the three spreadsheets and run a reconciliation
    #[command(after_help = "\
Examples:
  rcv submit --financial mov.xlsx --accounting razao.xlsx --general geral.xlsx
  rcv submit --financial mov.csv --accounting razao.csv --general geral.csv \\
      --company 3 --account 1.1.05 --closing-date 31/01/2026 -o jan.json
  rcv submit --financial m.csv --accounting r.csv --general g.csv -o - | rcv view -")]
    Submit {
        /// Financial movements spreadsheet (.xlsx, .xls or .csv)
        #[arg(long)]
        financial: PathBuf,

        /// Accounting report spreadsheet
        #[arg(long)]
        accounting: PathBuf,

        /// General ledger spreadsheet
        #[arg(long)]
        general: PathBuf,

        /// Company id (see `rcv companies`)
        #[arg(long)]
        company: Option<i64>,

        /// Ledger account code (see `rcv accounts`)
        #[arg(long)]
        account: Option<String>,

        /// Closing date, DD/MM/YYYY, must be the last day of its month
        #[arg(long)]
        closing_date: Option<String>,

        /// Where to write the report JSON (use - for stdout)
        #[arg(long, short = 'o', default_value = "report.json")]
        output: PathBuf,

        /// Reconciliation service base URL
        #[arg(long, env = "RECONVIEW_API_URL", default_value = api::DEFAULT_BASE_URL)]
        api_url: String,

        /// Suppress the summary printed after the run
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// List companies registered in the reconciliation service
    Companies {
        /// Reconciliation service base URL
        #[arg(long, env = "RECONVIEW_API_URL", default_value = api::DEFAULT_BASE_URL)]
        api_url: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List a company's chart of accounts
    Accounts {
        /// Company id (see `rcv companies`)
        #[arg(long)]
        company: i64,

        /// Reconciliation service base URL
        #[arg(long, env = "RECONVIEW_API_URL", default_value = api::DEFAULT_BASE_URL)]
        api_url: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn parse_page_size(s: &str) -> Result<PageSize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("not a number: {:?}", s))?;
    PageSize::new(n).ok_or_else(|| format!("rows must be one of 10, 20, 50, 100 (got {})", n))
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   debug",
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   release",
        )
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: rcv <command> [options]");
            eprintln!("       rcv --help for more information");
            Ok(())
        }
        Some(Commands::View { report, plain, rows }) => cmd_view(report, plain, rows),
        Some(Commands::Summary { report, json }) => summary::cmd_summary(&report, json),
        Some(Commands::Export {
            report,
            status,
            search,
            sort_by,
            direction,
            output,
            quiet,
        }) => export_cmd::cmd_export(&report, status, search, sort_by, direction, output, quiet),
        Some(Commands::Submit {
            financial,
            accounting,
            general,
            company,
            account,
            closing_date,
            output,
            api_url,
            quiet,
        }) => submit::cmd_submit(
            financial,
            accounting,
            general,
            company,
            account,
            closing_date,
            output,
            &api_url,
            quiet,
        ),
        Some(Commands::Companies { api_url, json }) => cmd_companies(&api_url, json),
        Some(Commands::Accounts {
            company,
            api_url,
            json,
        }) => cmd_accounts(&api_url, company, json),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    /// Wrap a report parse failure.
    pub fn report(err: ReportError) -> Self {
        Self {
            code: EXIT_REPORT_PARSE,
            message: err.to_string(),
            hint: Some("expected the report JSON produced by `rcv submit`".to_string()),
        }
    }

    /// Wrap a service error with the matching exit code.
    pub fn api(err: ApiError) -> Self {
        let code = api_exit_code(&err);
        let hint = match &err {
            ApiError::Connect(_) => Some(
                "is the reconciliation service running? (--api-url or RECONVIEW_API_URL)"
                    .to_string(),
            ),
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Read a report from a file, or from stdin when the path is `-`.
pub fn load_report(path: &PathBuf) -> Result<Report, CliError> {
    let data = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| CliError::io(format!("cannot read stdin: {}", e)))?;
        buf
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| CliError::io(format!("cannot read {}: {}", path.display(), e)))?
    };

    Report::from_json(&data).map_err(CliError::report)
}

fn report_label(path: &PathBuf) -> String {
    if path.as_os_str() == "-" {
        "stdin".to_string()
    } else {
        path.display().to_string()
    }
}

fn cmd_view(report: PathBuf, plain: bool, rows: Option<PageSize>) -> Result<(), CliError> {
    let parsed = load_report(&report)?;
    let label = report_label(&report);

    let mut table = DiffTable::new(parsed.records);
    if let Some(size) = rows {
        table.set_page_size(size);
    }

    // The interactive viewer needs a terminal on both ends: reading the
    // report from a pipe consumes the same stdin crossterm polls for keys.
    let interactive =
        !plain && atty::is(atty::Stream::Stdout) && atty::is(atty::Stream::Stdin);

    if !interactive {
        return tui::print_plain(&table).map_err(CliError::io);
    }

    tui::run(table, &label).map_err(|e| CliError {
        code: EXIT_ERROR,
        message: format!("terminal error: {}", e),
        hint: None,
    })
}

fn cmd_companies(api_url: &str, json: bool) -> Result<(), CliError> {
    let client = api::ApiClient::new(api_url);
    let companies = client.companies().map_err(CliError::api)?;

    if json {
        let out = serde_json::to_string_pretty(&companies)
            .map_err(|e| CliError::io(format!("JSON encode error: {}", e)))?;
        println!("{}", out);
        return Ok(());
    }

    if companies.is_empty() {
        println!("No companies registered.");
        return Ok(());
    }

    println!("{}  NAME", util::pad_left("ID", 6));
    for company in &companies {
        println!(
            "{}  {}",
            util::pad_left(&company.id.to_string(), 6),
            company.name,
        );
    }
    Ok(())
}

fn cmd_accounts(api_url: &str, company: i64, json: bool) -> Result<(), CliError> {
    let client = api::ApiClient::new(api_url);
    let accounts = client.accounts(company).map_err(CliError::api)?;

    if json {
        let out = serde_json::to_string_pretty(&accounts)
            .map_err(|e| CliError::io(format!("JSON encode error: {}", e)))?;
        println!("{}", out);
        return Ok(());
    }

    if accounts.is_empty() {
        println!("No accounts found for company {}.", company);
        return Ok(());
    }

    println!("{}  DESCRIPTION", util::pad_right("CODE", 14));
    for account in &accounts {
        println!(
            "{}  {}",
            util::pad_right(&account.code, 14),
            account.description,
        );
    }
    Ok(())
}
