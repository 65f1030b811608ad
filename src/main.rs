//! n2import - Import HTML documentation into an N2 content file

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use n2import::{Error, ImportOptions, ImportReport, OutputFormat, ParserMode, import_site};

#[derive(Parser)]
#[command(name = "n2import")]
#[command(version, about = "Import HTML documentation into an N2 content file", long_about = None)]
#[command(after_help = "EXAMPLES:
    n2import                      Import ./Documentation of the enclosing site
    n2import --dir site/sub -v    Start the site search elsewhere, with debug output
    n2import --format json -o n2data.json")]
struct Cli {
    /// Directory to start searching for the site settings file
    #[arg(long, value_name = "DIR", default_value = ".")]
    dir: PathBuf,

    /// Site settings file that marks the site root
    #[arg(long, value_name = "FILE", default_value = n2import::site::DEFAULT_MARKER_FILE)]
    marker: String,

    /// Documentation directory under the site root
    #[arg(long, value_name = "NAME", default_value = n2import::site::DEFAULT_DOCS_DIR)]
    docs_dir: String,

    /// Content file to write
    #[arg(short, long, value_name = "FILE", default_value = n2import::site::DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Content file format
    #[arg(long, value_enum, default_value_t = OutputFormat::Xml)]
    format: OutputFormat,

    /// Parse pages with HTML error recovery instead of strict XML
    #[arg(long)]
    html: bool,

    /// Show extracted options, parts, and properties
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let options = ImportOptions {
        start_dir: cli.dir,
        marker_file: cli.marker,
        docs_dir: cli.docs_dir,
        output: cli.output,
        format: cli.format,
        parser: if cli.html {
            ParserMode::Html
        } else {
            ParserMode::Xml
        },
    };

    let result = import_site(&options);
    report_outcome(
        result,
        &options,
        cli.quiet,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    )
}

/// Print the outcome of a run and pick the exit code.
///
/// A missing site marker is reported on `out`; other errors go to `err`.
fn report_outcome(
    result: Result<ImportReport, Error>,
    options: &ImportOptions,
    quiet: bool,
    out: &mut impl Write,
    err: &mut impl Write,
) -> ExitCode {
    match result {
        Ok(import) => {
            if !quiet {
                let _ = writeln!(
                    out,
                    "Imported {} pages from {} into {}",
                    import.report.parsed,
                    import.docs_dir.display(),
                    options.output.display()
                );
                for failure in &import.report.failures {
                    let _ = writeln!(out, "  skipped: {}", failure.message);
                }
            }
            ExitCode::SUCCESS
        }
        Err(e @ Error::RootMarkerNotFound { .. }) => {
            let _ = writeln!(out, "{e}");
            ExitCode::FAILURE
        }
        Err(e) => {
            let _ = writeln!(err, "error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
