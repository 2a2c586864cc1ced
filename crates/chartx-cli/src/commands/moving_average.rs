use chartx_core::{EntityId, TradingDate};
use serde::Serialize;

use crate::cli::MovingAverageArgs;
use crate::error::CliError;

use super::{CommandResult, Workspace};

#[derive(Debug, Serialize)]
struct OverlayPoint {
    date: TradingDate,
    close: f64,
    average: f64,
}

pub fn run(args: &MovingAverageArgs, mut workspace: Workspace) -> Result<CommandResult, CliError> {
    let id = EntityId::parse(&args.entity)?;
    let values = workspace.session.moving_average(&id, args.width)?;

    let points: Vec<OverlayPoint> = workspace
        .session
        .series(&id)
        .map(|series| series.bars())
        .unwrap_or_default()
        .iter()
        .zip(values.iter())
        .filter(|(bar, _)| args.from.is_none_or(|from| bar.date >= from))
        .filter(|(bar, _)| args.to.is_none_or(|to| bar.date <= to))
        .map(|(bar, average)| OverlayPoint {
            date: bar.date,
            close: bar.close,
            average: *average,
        })
        .collect();

    let mut warnings = Vec::new();
    if points.is_empty() {
        warnings.push(format!("no bars of '{id}' in the requested range"));
    }

    let data = serde_json::to_value(points)?;
    Ok(workspace.finish(data).with_warnings(warnings))
}
