use chartx_core::{DateIndex, SessionConfig, TradingDate};
use serde::Serialize;

use crate::cli::CalendarArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct CalendarData {
    origin: TradingDate,
    index: i64,
    date: TradingDate,
}

pub fn run(args: &CalendarArgs, config: SessionConfig) -> Result<CommandResult, CliError> {
    let mut index = DateIndex::new(config.origin);
    let mut warnings = Vec::new();

    let (position, date) = match args.date {
        Some(date) => {
            let position = index.index_of(date);
            let resolved = index.date_of(position);
            if resolved != date.snap_forward() {
                warnings.push(format!("{date} is beyond the calendar span, using {resolved}"));
            } else if resolved != date {
                warnings.push(format!("{date} is not a trading day, using {resolved}"));
            }
            (position, resolved)
        }
        // clap guarantees one of the two flags.
        None => {
            let requested = args.index.unwrap_or_default();
            let date = index.date_of(requested);
            let position = index.index_of(date);
            if position != requested {
                warnings.push(format!(
                    "index {requested} is beyond the calendar span, using {position}"
                ));
            }
            (position, date)
        }
    };

    let data = serde_json::to_value(CalendarData {
        origin: index.origin(),
        index: position,
        date,
    })?;
    Ok(CommandResult::ok(data).with_warnings(warnings))
}
