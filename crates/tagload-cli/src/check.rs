//! # Check Subcommand
//!
//! Loads one document into a bundled shape and reports the outcome.
//!
//! ## Exit Codes
//!
//! - `0`: the document loaded, required fields present, defaults applied.
//! - `1`: the load failed; the failure category and path are printed.
//! - `2`: operational error, such as an unreadable `--config` file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use tagload_loader::{AbsentParentPolicy, DocumentFormat, LoadError, LoadOptions, Loader};

use crate::shapes::Shape;

/// Input format override for `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Json,
    Yaml,
}

impl From<FormatArg> for DocumentFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => DocumentFormat::Json,
            FormatArg::Yaml => DocumentFormat::Yaml,
        }
    }
}

/// Arguments for the `tagload check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Record shape to load the document into.
    #[arg(long, value_enum)]
    pub shape: Shape,

    /// Document to load.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Input format; detected from the extension when omitted.
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Accept keys that the shape does not declare.
    #[arg(long)]
    pub allow_unknown: bool,

    /// Leave records absent from the input at their zero value.
    #[arg(long)]
    pub skip_absent_parents: bool,

    /// Print the loaded record as JSON on success.
    #[arg(long)]
    pub print: bool,
}

/// Read [`LoadOptions`] from a YAML or JSON file.
///
/// YAML is a superset of JSON, so one parser handles both.
pub fn read_options(path: &Path) -> Result<LoadOptions> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config file {}", path.display()))?;
    let options: LoadOptions = serde_yaml::from_str(&content)
        .with_context(|| format!("invalid config file {}", path.display()))?;
    Ok(options)
}

/// Resolve the effective options: config file first, then flags.
pub fn resolve_options(args: &CheckArgs, config: Option<&Path>) -> Result<LoadOptions> {
    let mut options = match config {
        Some(path) => read_options(path)?,
        None => LoadOptions::default(),
    };
    if let Some(format) = args.format {
        options = options.with_format(format.into());
    }
    if args.allow_unknown {
        options = options.allow_unknown_fields();
    }
    if args.skip_absent_parents {
        options = options.with_absent_parents(AbsentParentPolicy::Skip);
    }
    Ok(options)
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 on success, 1 on load failure, 2 on operational error.
pub fn run_check(args: &CheckArgs, config: Option<&Path>) -> Result<u8> {
    let options = resolve_options(args, config)?;
    tracing::debug!(?options, shape = %args.shape, "resolved load options");

    let loader = Loader::new(options);
    match args.shape.load(&loader, &args.path) {
        Ok(loaded) => {
            println!("OK: {} loaded as {}", args.path.display(), loaded.record);
            if args.print {
                let rendered = serde_json::to_string_pretty(&loaded.value)
                    .context("cannot render loaded record")?;
                println!("{rendered}");
            }
            Ok(0)
        }
        Err(e) => match e.downcast_ref::<LoadError>() {
            Some(load_err) => {
                println!("FAIL: {} ({})", args.path.display(), load_err.category());
                println!("  {load_err}");
                Ok(1)
            }
            None => Err(e),
        },
    }
}
