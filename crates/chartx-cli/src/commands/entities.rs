use chartx_core::SeriesSummary;

use crate::error::CliError;

use super::{CommandResult, Workspace};

pub fn run(workspace: Workspace) -> Result<CommandResult, CliError> {
    let rows: Vec<SeriesSummary> = workspace
        .session
        .catalog()
        .map(|series| series.summary())
        .collect();

    let data = serde_json::to_value(rows)?;
    Ok(workspace.finish(data))
}
