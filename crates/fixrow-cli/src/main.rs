#![allow(
    clippy::needless_pass_by_value,    // clap hands over owned values
    clippy::fn_params_excessive_bools, // CLI commands have many boolean flags
)]

//! fixrow CLI - rebuild table records from positioned PDF text
//!
//! Reads every document of the catalog, reconstructs its rows and writes
//! all records to a CSV file or a SQLite table.

mod config;
mod source;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use config::{Config, OutputFormat, CONFIG_FILE_NAME, DEFAULT_CONFIG_TEMPLATE};
use fixrow_core::{
    Admission, CatalogRunner, CompositeKey, FragmentFilter, FragmentSource, RunOptions, RunReport,
    TabularSink,
};
use fixrow_pdf::PdfSourceOptions;
use fixrow_sink::{CsvSink, SqliteSink, DEFAULT_TABLE};
use source::AutoSource;
use std::fs;
use std::path::{Path, PathBuf};

/// Verbosity level for output control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    const fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose > 0 {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    const fn should_show_output(self) -> bool {
        !matches!(self, Self::Quiet)
    }

    const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose)
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "fixrow",
    about = "Rebuild table records from positioned PDF text",
    long_about = "Rebuild fixed-layout table records from the positioned text fragments\n\
                  of PDF documents, repairing rows whose terminating column is missing.",
    version
)]
struct Args {
    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Use this config file instead of ./.fixrow.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Process the document catalog and write every record to the sink
    Run {
        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file (CSV file or SQLite database)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// SQLite table name
        #[arg(long, value_name = "NAME")]
        table: Option<String>,

        /// Directory of the built-in borough PDFs
        #[arg(long, value_name = "DIR")]
        pdf_dir: Option<PathBuf>,

        /// Only process documents with this tag (repeatable)
        #[arg(long, value_name = "TAG")]
        only: Vec<String>,

        /// Skip failed documents instead of stopping
        #[arg(long)]
        continue_on_error: bool,

        /// Process documents in parallel
        #[arg(long)]
        parallel: bool,

        /// Append a BBL column (BOROUGH_ID + BLOCK + LOT)
        #[arg(long)]
        composite_key: bool,

        /// Read at most N pages of each PDF
        #[arg(long, value_name = "N")]
        max_pages: Option<usize>,
    },

    /// Print the fragments a document yields and how the filter treats them
    Inspect {
        /// PDF or JSON fragment dump
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Print fragments as a JSON array (readable back as a .json document)
        #[arg(long)]
        json: bool,

        /// Read at most N pages
        #[arg(long, value_name = "N")]
        max_pages: Option<usize>,
    },

    /// Print the effective column schema
    Schema {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration files
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Create a configuration file with commented defaults
    Init {
        /// Create in the home directory instead of the current directory
        #[arg(long)]
        global: bool,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display the effective configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(quiet: bool, verbose: u8) {
    let level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.quiet, args.verbose);
    let verbosity = Verbosity::from_flags(args.quiet, args.verbose);
    let explicit = args.config.as_deref();

    match args.command {
        Commands::Run {
            format,
            output,
            table,
            pdf_dir,
            only,
            continue_on_error,
            parallel,
            composite_key,
            max_pages,
        } => {
            let config = Config::discover(explicit)?;
            run_command(
                &config,
                RunArgs {
                    format,
                    output,
                    table,
                    pdf_dir,
                    only,
                    continue_on_error,
                    parallel,
                    composite_key,
                    max_pages,
                },
                verbosity,
            )
        }
        Commands::Inspect {
            input,
            json,
            max_pages,
        } => {
            let config = Config::discover(explicit)?;
            inspect_command(&config, &input, json, max_pages)
        }
        Commands::Schema { json } => schema_command(&Config::discover(explicit)?, json),
        Commands::Config { action } => match action {
            ConfigAction::Init { global, force } => config_init(global, force, verbosity),
            ConfigAction::Show { json } => config_show(&Config::discover(explicit)?, json),
        },
    }
}

/// `run` flags; each one overrides its config value
struct RunArgs {
    format: Option<OutputFormat>,
    output: Option<PathBuf>,
    table: Option<String>,
    pdf_dir: Option<PathBuf>,
    only: Vec<String>,
    continue_on_error: bool,
    parallel: bool,
    composite_key: bool,
    max_pages: Option<usize>,
}

fn run_command(config: &Config, args: RunArgs, verbosity: Verbosity) -> Result<()> {
    let pipeline = config.pipeline()?;
    let catalog = config.catalog(args.pdf_dir.as_deref(), &args.only);
    if catalog.is_empty() {
        bail!("No documents to process");
    }

    let output_config = config.output();
    let run_config = config.run();
    let format = Config::resolve_output_format(args.format, output_config.format.as_deref())?;
    let output_path = args
        .output
        .or(output_config.path)
        .unwrap_or_else(|| PathBuf::from(format.default_path()));
    let options = RunOptions {
        continue_on_error: args.continue_on_error
            || run_config.continue_on_error.unwrap_or(false),
        parallel: args.parallel || run_config.parallel.unwrap_or(false),
    };
    let source = AutoSource::new(PdfSourceOptions {
        max_pages: args.max_pages.or(run_config.max_pages),
    });

    if verbosity.should_show_output() {
        println!(
            "{} {} document(s) with {} column(s)",
            "Processing".cyan().bold(),
            catalog.len(),
            pipeline.schema().len()
        );
    }

    let mut report = CatalogRunner::with_options(&pipeline, &source, options).run(&catalog);

    if args.composite_key || output_config.composite_key.unwrap_or(false) {
        report
            .append_key(&CompositeKey::bbl())
            .context("Cannot build the BBL column from this schema")?;
    }

    let mut sink: Box<dyn TabularSink> = match format {
        OutputFormat::Csv => {
            let sink = CsvSink::create(&output_path)
                .with_context(|| format!("Failed to create {}", output_path.display()))?;
            Box::new(sink.with_null_marker(output_config.null_marker.unwrap_or_default()))
        }
        OutputFormat::Sqlite => Box::new(
            SqliteSink::open(
                &output_path,
                args.table
                    .or(output_config.table)
                    .unwrap_or_else(|| DEFAULT_TABLE.to_string()),
            )
            .with_context(|| format!("Failed to open {}", output_path.display()))?,
        ),
    };
    report
        .write(sink.as_mut())
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    if verbosity.should_show_output() {
        print_report(&report, &output_path, verbosity);
    }
    print_failures(&report);

    if report.aborted {
        bail!(
            "Stopped after a failed document; rerun with --continue-on-error to skip failures"
        );
    }
    Ok(())
}

fn print_report(report: &RunReport, output_path: &Path, verbosity: Verbosity) {
    for doc in &report.documents {
        let diag = &doc.diagnostics;
        println!(
            "  {} {} (tag {}): {} record(s), {} recovered",
            "✓".green(),
            doc.entry.locator.display(),
            doc.entry.tag,
            diag.records_emitted,
            diag.recovered_rows
        );
        if diag.has_data_loss() {
            println!(
                "    {} {} fragment(s) not in any record",
                "Warning:".yellow().bold(),
                diag.fragments_lost()
            );
        }
        if verbosity.is_verbose() {
            println!("    {diag}");
        }
    }
    println!(
        "{} {} record(s) to {}",
        "Wrote".green().bold(),
        report.records.len(),
        output_path.display()
    );
}

/// Failed documents go to stderr, quiet or not
fn print_failures(report: &RunReport) {
    for failure in &report.failures {
        eprintln!(
            "  {} {} (tag {}): {}",
            "✗".red(),
            failure.entry.locator.display(),
            failure.entry.tag,
            failure.error
        );
    }
}

fn inspect_command(
    config: &Config,
    input: &Path,
    json_output: bool,
    max_pages: Option<usize>,
) -> Result<()> {
    let source = AutoSource::new(PdfSourceOptions {
        max_pages: max_pages.or(config.run().max_pages),
    });
    let fragments = source
        .collect(input)
        .with_context(|| format!("Failed to read fragments from {}", input.display()))?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&fragments)?);
        return Ok(());
    }

    let pipeline = config.pipeline()?;
    let filter = FragmentFilter::new(pipeline.schema(), pipeline.config().band);
    println!("{:>9} {:>9}  {:<8}  TEXT", "X", "Y", "STATUS");
    for fragment in &fragments {
        let status = match filter.admit(fragment) {
            Admission::Accepted(_) => "kept".normal(),
            Admission::OutsideBand => "band".dimmed(),
            Admission::Empty => "empty".dimmed(),
            Admission::HeaderLabel => "label".yellow(),
        };
        println!(
            "{:>9.2} {:>9.2}  {:<8}  {}",
            fragment.x, fragment.y, status, fragment.text
        );
    }
    println!("{} fragment(s)", fragments.len());
    Ok(())
}

fn schema_command(config: &Config, json_output: bool) -> Result<()> {
    let pipeline = config.pipeline()?;
    let schema = pipeline.schema();

    if json_output {
        println!("{}", serde_json::to_string_pretty(schema.fields())?);
        return Ok(());
    }

    println!(
        "signature axis: {}, band: ({}, {})",
        schema.signature_axis(),
        pipeline.config().band.min,
        pipeline.config().band.max
    );
    for (column, field) in schema.fields().iter().enumerate() {
        let role = if field.terminator {
            "terminator"
        } else if field.tag {
            "tag"
        } else {
            ""
        };
        println!(
            "{column:>3}  {:<12} {:>8.1}  {role}",
            field.name, field.signature
        );
    }
    Ok(())
}

/// Create a new configuration file with commented defaults
fn config_init(global: bool, force: bool, verbosity: Verbosity) -> Result<()> {
    let config_path = if global {
        Config::user_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?
    } else {
        PathBuf::from(CONFIG_FILE_NAME)
    };

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists: {} (use --force to overwrite)",
            config_path.display()
        );
    }

    fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

    if verbosity.should_show_output() {
        println!(
            "{} Created configuration file: {}",
            "Success:".green().bold(),
            config_path.display()
        );
    }
    Ok(())
}

/// Display the current effective configuration
fn config_show(config: &Config, json_output: bool) -> Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        println!("{}", toml::to_string_pretty(config)?);
    }
    Ok(())
}
