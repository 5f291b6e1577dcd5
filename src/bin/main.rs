use accents_core::core::table::ENTRIES;
use accents_core::{ConversionJob, ConversionReport, ConvertOptions, Endpoint, ReportFormat};
use anyhow::{bail, Result};
use clap::Parser;
use crossterm::style::Stylize;
use crossterm::tty::IsTty;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::debug;

#[derive(Parser)]
#[command(name = "html-accents")]
#[command(author, version, about = "Convert accented letters into their HTML entities", long_about = None)]
struct Cli {
    /// File to convert ("-" reads stdin)
    #[arg(required_unless_present = "list")]
    input: Option<String>,

    /// Output file ("-" writes stdout)
    #[arg(required_unless_present_any = ["list", "in_place"], conflicts_with = "in_place")]
    output: Option<String>,

    /// Replace INPUT with its converted text
    #[arg(short, long)]
    in_place: bool,

    /// How to print the result on stderr
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,

    /// Print the substitution table and exit
    #[arg(long)]
    list: bool,

    /// Never style the status line
    #[arg(long)]
    no_color: bool,
}

impl Cli {
    fn options(&self) -> ConvertOptions {
        ConvertOptions {
            report: self.report,
            color: !self.no_color && io::stderr().is_tty(),
        }
    }

    fn job(&self) -> Result<ConversionJob> {
        let Some(input) = self.input.as_deref() else {
            bail!("an input file is required");
        };

        if self.in_place {
            if input == "-" {
                bail!("--in-place needs a file, not stdin");
            }
            return Ok(ConversionJob::in_place(input));
        }

        match self.output.as_deref() {
            Some(output) => Ok(ConversionJob::new(Endpoint::parse(input), Endpoint::parse(output))),
            None => bail!("an output file is required"),
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let options = cli.options();

    if cli.list {
        return match print_table() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => report_failure(&anyhow::Error::from(e), options),
        };
    }

    match convert(&cli, options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_failure(&e, options),
    }
}

fn convert(cli: &Cli, options: ConvertOptions) -> Result<()> {
    let report = cli.job()?.run()?;
    print_status(&report, options)
}

fn print_table() -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    for (c, name) in ENTRIES {
        writeln!(stdout, "{}\t&{};", c, name)?;
    }
    stdout.flush()
}

fn print_status(report: &ConversionReport, options: ConvertOptions) -> Result<()> {
    let line = options.report.render(report)?;
    if options.color && options.report == ReportFormat::Text {
        eprintln!("{}", line.as_str().green());
    } else {
        eprintln!("{}", line);
    }
    Ok(())
}

fn report_failure(err: &anyhow::Error, options: ConvertOptions) -> ExitCode {
    for cause in err.chain().skip(1) {
        debug!("caused by: {}", cause);
    }
    if options.color {
        let message = err.to_string();
        eprintln!("{}", message.as_str().red());
    } else {
        eprintln!("{}", err);
    }
    ExitCode::FAILURE
}
