use chartx_core::EntityStats;

use crate::cli::EvaluateArgs;
use crate::error::CliError;

use super::{CommandResult, Workspace};

pub fn run(args: &EvaluateArgs, mut workspace: Workspace) -> Result<CommandResult, CliError> {
    let (ids, errors) = workspace.resolve(&args.entities)?;
    let session = &mut workspace.session;
    session.set_requested(&ids)?;

    match (args.span, args.from, args.to) {
        (Some(span), _, _) => {
            session.select_trailing(span);
        }
        (None, Some(from), Some(to)) => {
            session.select_dates(from, to);
        }
        _ => session.clear_selection(),
    }

    let evaluation = session.evaluate()?;
    let mut warnings = Vec::new();
    if evaluation.is_empty() {
        warnings.push(String::from("selection is empty, nothing was evaluated"));
    }
    for (id, stats) in &evaluation.stats {
        if matches!(stats, EntityStats::NoData) {
            warnings.push(format!("'{id}' has no bars near the selection edges"));
        }
    }

    let data = serde_json::to_value(evaluation)?;
    Ok(workspace
        .finish(data)
        .with_warnings(warnings)
        .with_errors(errors))
}
