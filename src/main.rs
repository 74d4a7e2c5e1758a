//! Purpose: `modjson` CLI entry point and command dispatch.
//! Role: Binary crate root; parses args, runs commands, emits JSON on stdout.
//! Invariants: Commands emit stable stdout formats (canonical dump or compact JSON).
//! Invariants: Non-interactive errors and notices are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
//! Invariants: Every run gets its own `DiagnosticsLog`; nothing is shared across runs.
use std::ffi::OsString;
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{
    CommandFactory, Parser, Subcommand, ValueEnum, ValueHint, error::ErrorKind as ClapErrorKind,
};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};
use std::error::Error as StdError;
use tracing_subscriber::EnvFilter;

mod command_dispatch;

use modjson::api::{Direction, Error, ErrorKind, render_canonical, to_exit_code};
use modjson::notice::{Notice, notice_json};

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err((err, color_mode)) => {
            emit_error(&err, color_mode);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, (Error, ColorMode)> {
    let cli = match Cli::try_parse_from(normalize_args(std::env::args_os())) {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    (
                        Error::new(ErrorKind::Io)
                            .with_message("failed to write help")
                            .with_source(io_err),
                        ColorMode::Auto,
                    )
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome { exit_code });
            }
            _ => {
                let message = clap_error_summary(&err);
                let hint = clap_error_hint(&err);
                return Err((
                    Error::new(ErrorKind::Usage)
                        .with_message(message)
                        .with_hint(hint),
                    ColorMode::Auto,
                ));
            }
        },
    };

    let color_mode = cli.color;
    command_dispatch::dispatch_command(cli.command, color_mode)
        .map_err(add_io_hint)
        .map_err(add_internal_hint)
        .map_err(|err| (err, color_mode))
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}

fn clap_error_hint(err: &clap::Error) -> String {
    let rendered = err.to_string();
    rendered
        .lines()
        .find_map(|line| line.trim().strip_prefix("Usage: "))
        .map(|usage| format!("Usage: {}", usage.trim()))
        .unwrap_or_else(|| "Try `modjson --help`.".to_string())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            let replacement = arg.to_str().and_then(|value| match value {
                "---help" => Some("--help"),
                "---version" => Some("--version"),
                _ => None,
            });
            replacement.map(OsString::from).unwrap_or(arg)
        })
        .collect()
}

#[derive(Parser)]
#[command(
    name = "modjson",
    version,
    about = "JSON codecs and run diagnostics for controller/module messaging",
    long_about = None,
    after_help = r#"EXAMPLES
  $ echo '{"b": 1, "a": 2}' | modjson dump
  $ modjson encode --module ping --direction controller-to-module args.json
  $ modjson result --module ping --warn "low disk" result.json

  $ modjson <command> --help"#,
    arg_required_else_help = true
)]
struct Cli {
    #[arg(
        long,
        default_value = "auto",
        value_enum,
        help = "Colorize stderr diagnostics and pretty JSON output: auto|always|never"
    )]
    color: ColorMode,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

fn parse_direction(value: &str) -> Result<Direction, Error> {
    value.parse()
}

#[derive(Subcommand)]
enum Command {
    #[command(
        about = "Print the canonical dump of a JSON document",
        long_about = r#"Decode a JSON document and print it with sorted keys and 4-space indentation.

Two documents that differ only in key order produce byte-identical dumps."#,
        after_help = r#"EXAMPLES
  $ modjson dump result.json
  $ echo '{"b": 1, "a": 2}' | modjson dump"#
    )]
    Dump {
        #[arg(help = "Input file (default: stdin; use - for stdin)", value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },
    #[command(
        about = "Re-encode a JSON document with a resolved profile",
        after_help = r#"EXAMPLES
  $ modjson encode --profile default args.json
  $ modjson encode --module ping --direction module-to-controller result.json

NOTES
  - `--module` requires `--direction`; `--profile` cannot be combined with either"#
    )]
    Encode {
        #[arg(help = "Input file (default: stdin; use - for stdin)", value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        #[arg(long, help = "Named codec profile", conflicts_with_all = ["module", "direction"])]
        profile: Option<String>,
        #[arg(long, help = "Module name for a directional profile", requires = "direction")]
        module: Option<String>,
        #[arg(
            long,
            value_parser = parse_direction,
            help = "Message direction: controller-to-module|module-to-controller",
            requires = "module"
        )]
        direction: Option<Direction>,
    },
    #[command(
        about = "Finalize a module result with run diagnostics",
        long_about = r#"Read a module result object and merge run diagnostics into it.

Warnings and deprecations already present in the result are absorbed first, so the
output carries each message once, in first-seen order."#,
        after_help = r#"EXAMPLES
  $ modjson result --module ping result.json
  $ modjson result --module ping --warn "low disk" --deprecate "old flag" --removed-in 3.0 result.json
  $ modjson result --module ping --deprecate "old flag" --removed-on 2031-01-01 --notices result.json"#
    )]
    Result {
        #[arg(help = "Input file (default: stdin; use - for stdin)", value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        #[arg(long, help = "Module that produced the result")]
        module: String,
        #[arg(long = "warn", help = "Repeatable warning to record")]
        warnings: Vec<String>,
        #[arg(long = "deprecate", help = "Repeatable deprecation message to record")]
        deprecations: Vec<String>,
        #[arg(
            long,
            help = "Version in which deprecated features are removed",
            conflicts_with = "removed_on"
        )]
        removed_in: Option<String>,
        #[arg(long, help = "Date (YYYY-MM-DD) on which deprecated features are removed")]
        removed_on: Option<String>,
        #[arg(long, help = "Collection that owns the deprecated features")]
        collection: Option<String>,
        #[arg(long, help = "Also emit each diagnostic as a notice on stderr")]
        notices: bool,
    },
    #[command(about = "Generate shell completion scripts")]
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn read_input(file: Option<&PathBuf>) -> Result<Vec<u8>, Error> {
    match file {
        Some(path) if path.as_os_str() != "-" => fs::read(path).map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message(format!("failed to read {}", path.display()))
                .with_source(err)
        }),
        _ => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf).map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message("failed to read stdin")
                    .with_source(err)
            })?;
            Ok(buf)
        }
    }
}

fn emit_json(value: &Value, color_mode: ColorMode) -> Result<(), Error> {
    let is_tty = io::stdout().is_terminal();
    let use_color = color_mode.use_color(is_tty);
    let json = if is_tty || use_color {
        render_canonical(value, use_color)
    } else {
        serde_json::to_string(value).map_err(|err| {
            Error::new(ErrorKind::Serialization)
                .with_message("failed to encode output")
                .with_source(err)
        })?
    };
    println!("{json}");
    Ok(())
}

#[derive(Copy, Clone, Debug)]
enum AnsiColor {
    Red,
    Yellow,
}

fn colorize_label(label: &str, enabled: bool, color: AnsiColor) -> String {
    if !enabled {
        return label.to_string();
    }
    let code = match color {
        AnsiColor::Red => "31",
        AnsiColor::Yellow => "33",
    };
    format!("\u{1b}[{code}m{label}\u{1b}[0m")
}

fn emit_error(err: &Error, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("{}", error_text(err, color_mode.use_color(is_tty)));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn notice_time_now() -> Option<String> {
    use time::format_description::well_known::Rfc3339;
    let duration = SystemTime::now().duration_since(UNIX_EPOCH).ok()?;
    let ts = time::OffsetDateTime::from_unix_timestamp_nanos(duration.as_nanos() as i128).ok()?;
    ts.format(&Rfc3339).ok()
}

fn emit_notice(notice: &Notice, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        let label = format!("{}:", notice.kind.as_str());
        let label = colorize_label(&label, color_mode.use_color(is_tty), AnsiColor::Yellow);
        eprintln!("{label} {}", notice.message);
        return;
    }

    let value = notice_json(notice);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"notice\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn add_io_hint(err: Error) -> Error {
    if err.hint().is_some() || err.kind() != ErrorKind::Io {
        return err;
    }
    err.with_hint("I/O error. Check the input path and permissions.")
}

fn add_internal_hint(err: Error) -> Error {
    if err.kind() != ErrorKind::Internal || err.hint().is_some() {
        return err;
    }
    err.with_hint("Unexpected internal error. Re-run with RUST_LOG=debug for details.")
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::Serialization => "serialization error".to_string(),
        ErrorKind::Parse => "parse error".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(line) = err.line() {
        inner.insert("line".to_string(), json!(line));
    }
    if let Some(column) = err.column() {
        inner.insert("column".to_string(), json!(column));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error, use_color: bool) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} {}",
        colorize_label("error:", use_color, AnsiColor::Red),
        error_message(err)
    ));
    if let Some(hint) = err.hint() {
        lines.push(format!(
            "{} {hint}",
            colorize_label("hint:", use_color, AnsiColor::Yellow)
        ));
    }
    if let (Some(line), Some(column)) = (err.line(), err.column()) {
        lines.push(format!(
            "{} line {line}, column {column}",
            colorize_label("at:", use_color, AnsiColor::Yellow)
        ));
    }
    for cause in error_causes(err) {
        lines.push(format!(
            "{} {cause}",
            colorize_label("caused by:", use_color, AnsiColor::Yellow)
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, clap_error_hint, clap_error_summary, error_json, normalize_args};
    use modjson::api::Direction;
    use clap::Parser;
    use modjson::api::{Error, ErrorKind};
    use std::ffi::OsString;

    #[test]
    fn triple_dash_help_is_normalized() {
        let args = normalize_args(["modjson", "---help"].map(OsString::from));
        assert_eq!(args[1], OsString::from("--help"));
    }

    #[test]
    fn module_requires_direction() {
        let parsed = Cli::try_parse_from(["modjson", "encode", "--module", "ping"]);
        assert!(parsed.is_err());
        let parsed = Cli::try_parse_from([
            "modjson",
            "encode",
            "--module",
            "ping",
            "--direction",
            "module-to-controller",
        ])
        .expect("parse");
        assert!(matches!(
            parsed.command,
            Command::Encode {
                direction: Some(Direction::ModuleToController),
                ..
            }
        ));
    }

    #[test]
    fn direction_flag_uses_direction_text_forms() {
        for direction in Direction::ALL {
            let text = direction.to_string();
            let parsed = Cli::try_parse_from([
                "modjson",
                "encode",
                "--module",
                "ping",
                "--direction",
                text.as_str(),
            ])
            .expect("parse");
            let Command::Encode {
                direction: parsed_direction,
                ..
            } = parsed.command
            else {
                panic!("expected encode");
            };
            assert_eq!(parsed_direction, Some(direction));
        }

        let rejected = Cli::try_parse_from([
            "modjson",
            "encode",
            "--module",
            "ping",
            "--direction",
            "sideways",
        ]);
        assert!(rejected.is_err());
    }

    #[test]
    fn clap_errors_are_summarized() {
        let err = match Cli::try_parse_from(["modjson", "encode", "--bogus"]) {
            Err(err) => err,
            Ok(_) => panic!("expected parse failure"),
        };
        let summary = clap_error_summary(&err);
        assert!(!summary.starts_with("error:"));
        assert!(summary.contains("--bogus"));
        assert!(clap_error_hint(&err).contains("modjson"));
    }

    #[test]
    fn error_json_carries_position() {
        let err = Error::new(ErrorKind::Parse)
            .with_message("invalid JSON")
            .with_position(1, 4);
        let value = error_json(&err);
        assert_eq!(value["error"]["kind"], "Parse");
        assert_eq!(value["error"]["line"], 1);
        assert_eq!(value["error"]["column"], 4);
    }
}
