use chartx_core::{PriceRange, TradingDate};
use serde::Serialize;

use crate::cli::RangeArgs;
use crate::error::CliError;

use super::{CommandResult, Workspace};

#[derive(Debug, Serialize)]
struct RangeData {
    from: TradingDate,
    to: TradingDate,
    range: Option<PriceRange>,
}

pub fn run(args: &RangeArgs, mut workspace: Workspace) -> Result<CommandResult, CliError> {
    let (ids, errors) = workspace.resolve(&args.entities)?;
    workspace.session.set_requested(&ids)?;

    let range = workspace.session.price_range(args.from, args.to);
    let data = serde_json::to_value(RangeData {
        from: args.from,
        to: args.to,
        range,
    })?;

    let mut result = workspace.finish(data).with_errors(errors);
    if range.is_none() {
        result = result.with_warning("no requested bars in the date range");
    }
    Ok(result)
}
