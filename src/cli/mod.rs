//! TV-011: CLI subcommands: convert, validate, list-supported-resources, version.
//!
//! Execution is an explicit pipeline:
//! parse → route diagnostics → negotiate `--tf-version` → build settings → dispatch.

use crate::collab::{Collaborators, Converter, ResourceCatalog};
use crate::core::error::Error;
use crate::core::logging;
use crate::core::settings::{non_empty, Command, ConvertSettings, Settings, ValidateSettings};
use crate::core::types::{Overrides, Violation};
use crate::core::version::{self, TfVersion};
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{CommandFactory, Parser, Subcommand};
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "terraform-validator",
    version,
    about = "Validate terraform plans using policy constraints.",
    long_about = "Validate terraform plans by converting terraform resources to their \
                  canonical asset format and passing them through a policy engine."
)]
pub struct Cli {
    /// Log output to stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Terraform plan format version; possible values are [0.11, 0.12] (default 0.11)
    #[arg(long = "tf-version", global = true, value_name = "VERSION")]
    pub tf_version: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert resources in a Terraform plan to their asset representation
    Convert {
        /// Path to the Terraform plan (JSON)
        plan: PathBuf,

        /// Provider project override (used when a resource sets no project)
        #[arg(long)]
        project: Option<String>,

        /// Override the ancestry location of the project
        #[arg(long)]
        ancestry: Option<String>,
    },

    /// Validate that a Terraform plan conforms to the policy constraints
    Validate {
        /// Path to the Terraform plan (JSON)
        plan: PathBuf,

        /// Path to directory containing validation policies
        #[arg(long = "policy-path", required = true)]
        policy_path: PathBuf,

        /// Provider project override (used when a resource sets no project)
        #[arg(long)]
        project: Option<String>,

        /// Override the ancestry location of the project
        #[arg(long)]
        ancestry: Option<String>,

        /// Print violations as JSON
        #[arg(long = "output-json")]
        output_json: bool,
    },

    /// List supported terraform resources
    ListSupportedResources,

    /// Print the build version of this tool
    Version,
}

impl From<Commands> for Command {
    fn from(cmd: Commands) -> Self {
        match cmd {
            Commands::Convert {
                plan,
                project,
                ancestry,
            } => Command::Convert(ConvertSettings {
                plan,
                overrides: Overrides {
                    project: non_empty(project),
                    ancestry: non_empty(ancestry),
                },
            }),
            Commands::Validate {
                plan,
                policy_path,
                project,
                ancestry,
                output_json,
            } => Command::Validate(ValidateSettings {
                plan,
                overrides: Overrides {
                    project: non_empty(project),
                    ancestry: non_empty(ancestry),
                },
                policy_path,
                output_json,
            }),
            Commands::ListSupportedResources => Command::ListSupportedResources,
            Commands::Version => Command::Version,
        }
    }
}

/// Entry point for all commands: parse `args`, then run the pipeline.
pub fn execute<I, T>(args: I, collab: &Collaborators<'_>, out: &mut dyn Write) -> Result<(), Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => return parse_failure(e, out),
    };
    // Routing must be in place before negotiation can warn.
    logging::init(cli.verbose);
    run(cli, collab, out)
}

/// Negotiate, build the settings, and dispatch. Diagnostics must already be routed.
pub fn run(cli: Cli, collab: &Collaborators<'_>, out: &mut dyn Write) -> Result<(), Error> {
    let Some(command) = cli.command else {
        write!(out, "{}", Cli::command().render_help())?;
        return Ok(());
    };

    let negotiated = version::negotiate(cli.tf_version.as_deref())?;
    let settings = Settings {
        verbose: cli.verbose,
        tf_version: negotiated.version(),
        command: command.into(),
    };
    tracing::debug!(
        "running {} with --tf-version {}",
        settings.command.name(),
        settings.tf_version
    );
    dispatch(&settings, collab, out)
}

/// Dispatch to the handler for the selected subcommand.
pub fn dispatch(
    settings: &Settings,
    collab: &Collaborators<'_>,
    out: &mut dyn Write,
) -> Result<(), Error> {
    match &settings.command {
        Command::Convert(c) => cmd_convert(c, settings.tf_version, collab.converter, out),
        Command::Validate(v) => cmd_validate(v, settings.tf_version, collab, out),
        Command::ListSupportedResources => cmd_list_supported_resources(collab.catalog, out),
        Command::Version => cmd_version(out),
    }
}

/// Map a clap failure onto the crate's error kinds. Help and version output succeed.
fn parse_failure(e: clap::Error, out: &mut dyn Write) -> Result<(), Error> {
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            write!(out, "{}", e.render())?;
            Ok(())
        }
        ErrorKind::MissingRequiredArgument => Err(Error::MissingRequiredFlag {
            flags: missing_flags(&e),
        }),
        _ => {
            let rendered = e.render().to_string();
            let message = rendered.trim_end();
            Err(Error::Usage(
                message.strip_prefix("error: ").unwrap_or(message).to_string(),
            ))
        }
    }
}

fn missing_flags(e: &clap::Error) -> Vec<String> {
    match e.get(ContextKind::InvalidArg) {
        Some(ContextValue::Strings(flags)) => flags.clone(),
        Some(ContextValue::String(flag)) => vec![flag.clone()],
        _ => Vec::new(),
    }
}

fn cmd_convert(
    settings: &ConvertSettings,
    version: TfVersion,
    converter: &dyn Converter,
    out: &mut dyn Write,
) -> Result<(), Error> {
    let assets = converter.convert(&settings.plan, version, &settings.overrides)?;
    let json = serde_json::to_string_pretty(&assets).map_err(std::io::Error::from)?;
    writeln!(out, "{}", json)?;
    Ok(())
}

fn cmd_validate(
    settings: &ValidateSettings,
    version: TfVersion,
    collab: &Collaborators<'_>,
    out: &mut dyn Write,
) -> Result<(), Error> {
    let assets = collab
        .converter
        .convert(&settings.plan, version, &settings.overrides)?;
    let violations = collab.engine.validate(&assets, &settings.policy_path)?;

    if settings.output_json {
        let json = serde_json::to_string_pretty(&violations).map_err(std::io::Error::from)?;
        writeln!(out, "{}", json)?;
    } else {
        print_violations(&violations, out)?;
    }
    Ok(())
}

/// Human-readable violation report.
fn print_violations(violations: &[Violation], out: &mut dyn Write) -> std::io::Result<()> {
    if violations.is_empty() {
        return writeln!(out, "No violations found.");
    }
    writeln!(out, "Found Violations:")?;
    for v in violations {
        writeln!(out)?;
        writeln!(out, "Constraint {} on resource {}: {}", v.constraint, v.resource, v.message)?;
        if !v.severity.is_empty() {
            writeln!(out, "  Severity: {}", v.severity)?;
        }
    }
    Ok(())
}

fn cmd_list_supported_resources(
    catalog: &dyn ResourceCatalog,
    out: &mut dyn Write,
) -> Result<(), Error> {
    for name in catalog.supported_resources() {
        writeln!(out, "{}", name)?;
    }
    Ok(())
}

fn cmd_version(out: &mut dyn Write) -> Result<(), Error> {
    writeln!(out, "Build version: {}", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
