//! Command-line parsing for the `convio` binary.
//!
//! Flags are declared with clap derive. What clap does not know about is
//! done here afterwards: bare locations are claimed into the source and
//! target slots, format keywords and delimiters are checked, and clap's
//! errors are mapped onto [`ConfigError`] so the binary keeps its exit codes.
//! Nothing is opened or created; locations and codecs are resolved later by
//! [`ConvertBuilder`](crate::ConvertBuilder).
//!
//! ```rust
//! use convio::cli::{Invocation, parse_args};
//! use convio::FormatKind;
//!
//! let invocation = parse_args(["people.csv", "-o", "json", "-T", "-"]).unwrap();
//! let Invocation::Convert(config) = invocation else { panic!("expected a conversion") };
//!
//! assert_eq!(config.source.as_deref(), Some("people.csv"));
//! assert_eq!(config.target.as_deref(), Some("-"));
//! assert_eq!(config.target_type, Some(FormatKind::Json));
//! assert!(config.coerce);
//! ```

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{ArgAction, CommandFactory, Parser};

use crate::config::PipelineConfig;
use crate::error::ConfigError;
use crate::format::FormatKind;

/// Transforms a file from its original format to the provided one.
#[derive(Parser, Debug)]
#[command(name = "convio")]
#[command(override_usage = "convio [options] <source> <target>")]
#[command(disable_help_flag = true, args_override_self = true)]
struct Args {
    /// Alternate method of specifying the source file, or "-" for piped data.
    /// When piping data the input type must be specified.
    #[arg(short = 's', long, value_name = "LOCATION")]
    source: Option<String>,

    /// Specify the format of the source file.
    #[arg(short = 'i', long, value_name = "FORMAT")]
    source_type: Option<String>,

    /// Alternate method of specifying the target file, or "-" to pipe out.
    /// When piping data out the target type must be specified.
    #[arg(short = 't', long, value_name = "LOCATION")]
    target: Option<String>,

    /// Specify the format of the target file.
    #[arg(short = 'o', long, value_name = "FORMAT")]
    target_type: Option<String>,

    /// Enable compression when writing a jbin file.
    #[arg(short = 'z', long = "jbin-compress", action = ArgAction::SetTrue)]
    compress: bool,

    /// Set the column delimiter if the source is a delimited file (e.g. , or |).
    #[arg(short = 'D', long, value_name = "DELIMITER", allow_hyphen_values = true)]
    source_delimiter: Option<String>,

    /// Set the column delimiter if the target is a delimited file (e.g. , or |).
    #[arg(short = 'd', long, value_name = "DELIMITER", allow_hyphen_values = true)]
    target_delimiter: Option<String>,

    /// Attempts to automatically coerce strings in the input records into
    /// numbers and booleans.
    #[arg(short = 'T', long = "detect-input-types", action = ArgAction::SetTrue)]
    coerce: bool,

    /// Print this help.
    #[arg(short = 'h', long, visible_short_alias = '?', action = ArgAction::SetTrue)]
    help: bool,

    /// Source then target location; fills whichever slot the flags left open.
    #[arg(value_name = "LOCATION")]
    locations: Vec<String>,
}

/// What the parsed arguments ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Print usage and stop
    Help,
    /// Run one conversion
    Convert(PipelineConfig),
}

/// Parse command-line arguments (without the program name).
///
/// A repeated flag keeps its last value. Help is reported whenever the
/// arguments parse, before format keywords or delimiters are checked.
/// Completeness is not checked here, see
/// [`ConvertBuilder::validate`](crate::ConvertBuilder::validate).
pub fn parse_args<I, S>(args: I) -> Result<Invocation, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv = std::iter::once("convio".to_string())
        .chain(args.into_iter().map(|s| s.as_ref().to_string()));
    let args = Args::try_parse_from(argv).map_err(config_error)?;

    if args.help {
        return Ok(Invocation::Help);
    }

    let mut config = PipelineConfig {
        source: args.source,
        target: args.target,
        compress: args.compress,
        coerce: args.coerce,
        ..PipelineConfig::default()
    };

    if let Some(keyword) = args.source_type {
        let kind = FormatKind::from_keyword(&keyword).ok_or(ConfigError::UnknownSourceType(keyword))?;
        config.source_type = Some(kind);
    }
    if let Some(keyword) = args.target_type {
        let kind = FormatKind::from_keyword(&keyword).ok_or(ConfigError::UnknownTargetType(keyword))?;
        config.target_type = Some(kind);
    }
    config.source_delimiter = args.source_delimiter.as_deref().map(parse_delimiter).transpose()?;
    config.target_delimiter = args.target_delimiter.as_deref().map(parse_delimiter).transpose()?;

    for location in args.locations {
        claim_location(&mut config, location)?;
    }

    Ok(Invocation::Convert(config))
}

fn claim_location(config: &mut PipelineConfig, location: String) -> Result<(), ConfigError> {
    if config.source.is_none() {
        config.source = Some(location);
    } else if config.target.is_none() {
        config.target = Some(location);
    } else {
        return Err(ConfigError::UnknownParameter(location));
    }
    Ok(())
}

fn config_error(error: clap::Error) -> ConfigError {
    // clap renders the offending argument as e.g. "--target <LOCATION>".
    let offending = match error.get(ContextKind::InvalidArg) {
        Some(ContextValue::String(arg)) => arg.split_whitespace().next().map(str::to_string),
        _ => None,
    };
    let offending = offending.unwrap_or_else(|| error.kind().to_string());

    match error.kind() {
        ErrorKind::InvalidValue | ErrorKind::NoEquals => ConfigError::MissingValue(offending),
        _ => ConfigError::UnknownParameter(offending),
    }
}

/// Parse a delimiter argument: one ASCII character, or the escape `\t`.
pub fn parse_delimiter(value: &str) -> Result<char, ConfigError> {
    if value == "\\t" {
        return Ok('\t');
    }

    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c),
        _ => Err(ConfigError::InvalidDelimiter(value.to_string())),
    }
}

/// Usage text for the `convio` binary.
pub fn usage() -> String {
    let formats = FormatKind::ALL
        .iter()
        .map(|k| k.keyword())
        .collect::<Vec<_>>()
        .join(", ");

    Args::command()
        .after_help(format!("Supported formats: {formats}"))
        .render_help()
        .to_string()
}
