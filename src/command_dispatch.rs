//! Purpose: Hold top-level CLI command dispatch for `modjson`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: Inputs are decoded with the resolved decoder for the command's leg.
//! Invariants: Each `result` run records into a fresh `DiagnosticsLog`.

use super::*;

use modjson::api::{
    CodecProfile, Deprecation, DiagnosticsLog, dump_canonical, finalize_result,
    resolve_module_decoder, resolve_module_encoder,
};
use modjson::notice::notices_for;
use tracing::debug;

const DUMP_PROFILE: &str = "canonical-dump";

pub(super) fn dispatch_command(
    command: Command,
    color_mode: ColorMode,
) -> Result<RunOutcome, Error> {
    match command {
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "modjson", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
        Command::Dump { file } => {
            let input = read_input(file.as_ref())?;
            let value: Value = CodecProfile::named(DUMP_PROFILE)
                .decoder()
                .decode_slice(&input)?;
            println!("{}", dump_canonical(&value)?);
            Ok(RunOutcome::ok())
        }
        Command::Encode {
            file,
            profile,
            module,
            direction,
        } => {
            let profile = match (profile, module, direction) {
                (Some(name), None, None) => CodecProfile::named(name),
                (None, Some(module), Some(direction)) => {
                    CodecProfile::module(module, direction)
                }
                (None, None, None) => CodecProfile::named("default"),
                _ => {
                    return Err(Error::new(ErrorKind::Usage)
                        .with_message("use either --profile or --module with --direction")
                        .with_hint("Run `modjson encode --help` for examples."));
                }
            };
            let input = read_input(file.as_ref())?;
            let value: Value = profile.decoder().decode_slice(&input)?;
            println!("{}", profile.encoder().encode(&value)?);
            Ok(RunOutcome::ok())
        }
        Command::Result {
            file,
            module,
            warnings,
            deprecations,
            removed_in,
            removed_on,
            collection,
            notices,
        } => {
            if let Some(date) = &removed_on {
                validate_removal_date(date)?;
            }
            let input = read_input(file.as_ref())?;
            let value: Value = resolve_module_decoder(&module, Direction::ModuleToController)
                .decode_slice(&input)?;
            let Value::Object(mut result) = value else {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message("module result must be a JSON object")
                    .with_hint("Wrap the payload in an object, e.g. {\"changed\": false}."));
            };

            let log = DiagnosticsLog::new();
            for warning in warnings {
                log.record_warning(warning);
            }
            for msg in deprecations {
                let mut entry = Deprecation::new(msg);
                if let Some(version) = &removed_in {
                    entry = entry.with_version(version.clone());
                }
                if let Some(date) = &removed_on {
                    entry = entry.with_date(date.clone());
                }
                if let Some(collection) = &collection {
                    entry = entry.with_collection_name(collection.clone());
                }
                log.record_deprecation(entry);
            }

            finalize_result(&mut result, &log);
            debug!(
                module = %module,
                warnings = log.warning_messages().len(),
                deprecations = log.deprecation_messages().len(),
                "finalized module result"
            );

            if notices {
                let time = notice_time_now().unwrap_or_default();
                for notice in notices_for(&log, "result", &time) {
                    emit_notice(&notice, color_mode);
                }
            }

            let result = Value::Object(result);
            if io::stdout().is_terminal() || matches!(color_mode, ColorMode::Always) {
                emit_json(&result, color_mode)?;
            } else {
                let encoder = resolve_module_encoder(&module, Direction::ModuleToController);
                println!("{}", encoder.encode(&result)?);
            }
            Ok(RunOutcome::ok())
        }
    }
}

fn validate_removal_date(date: &str) -> Result<(), Error> {
    let format = time::format_description::parse("[year]-[month]-[day]").map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("invalid date format description")
            .with_source(err)
    })?;
    time::Date::parse(date, format.as_slice()).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message(format!("invalid --removed-on date '{date}'"))
            .with_hint("Use the YYYY-MM-DD form, e.g. 2031-01-01.")
            .with_source(err)
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate_removal_date;
    use modjson::api::ErrorKind;

    #[test]
    fn removal_date_must_be_calendar_date() {
        assert!(validate_removal_date("2031-01-01").is_ok());
        let err = validate_removal_date("2031-13-01").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert!(validate_removal_date("01/01/2031").is_err());
    }
}
