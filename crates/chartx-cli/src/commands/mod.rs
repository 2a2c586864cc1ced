mod calendar;
mod entities;
mod evaluate;
mod moving_average;
mod range;

use std::collections::BTreeMap;

use chartx_core::{
    EntityId, Envelope, EnvelopeError, EnvelopeMeta, ExplorerSession, SessionConfig,
    SCHEMA_VERSION,
};
use chartx_data::DataConfig;
use serde_json::Value;
use uuid::Uuid;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub entity_count: usize,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
            entity_count: 0,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }
}

/// Loaded price data ready for a command.
pub struct Workspace {
    pub session: ExplorerSession,
    pub warnings: Vec<String>,
}

impl Workspace {
    fn open(cli: &Cli, config: SessionConfig) -> Result<Self, CliError> {
        let data_config = match &cli.data_dir {
            Some(dir) => DataConfig::default().with_data_dir(dir),
            None => DataConfig::default(),
        };
        let catalog = chartx_data::load_dir(&data_config)?;

        let mut warnings = Vec::new();
        if catalog.is_empty() {
            warnings.push(format!(
                "no price data found in {}",
                data_config.data_dir.display()
            ));
        }

        let session = ExplorerSession::with_series(config, catalog.into_series())?;

        Ok(Self {
            session,
            warnings,
        })
    }

    /// Wraps command output with the load warnings and catalog size.
    pub fn finish(self, data: Value) -> CommandResult {
        let mut result = CommandResult::ok(data).with_warnings(self.warnings);
        result.entity_count = self.session.catalog().count();
        result
    }

    /// Parses `raw` ids and splits them into loaded ids and per-id errors.
    pub fn resolve(&self, raw: &[String]) -> Result<(Vec<EntityId>, Vec<EnvelopeError>), CliError> {
        let mut known = Vec::new();
        let mut errors = Vec::new();
        for raw in raw {
            let id = EntityId::parse(raw)?;
            if self.session.series(&id).is_some() {
                known.push(id);
            } else {
                tracing::warn!(entity = %id, "skipping unknown entity");
                errors.push(EnvelopeError::new(
                    "unknown_entity",
                    format!("entity '{id}' is not loaded"),
                )?);
            }
        }
        Ok((known, errors))
    }
}

pub fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let mut config = SessionConfig::default();
    if let Some(origin) = cli.origin {
        config = config.with_origin(origin);
    }

    let result = match &cli.command {
        Command::Calendar(args) => calendar::run(args, config)?,
        Command::Entities => entities::run(Workspace::open(cli, config)?)?,
        Command::MovingAverage(args) => moving_average::run(args, Workspace::open(cli, config)?)?,
        Command::Evaluate(args) => evaluate::run(args, Workspace::open(cli, config)?)?,
        Command::Range(args) => range::run(args, Workspace::open(cli, config)?)?,
    };

    build_envelope(result)
}

fn build_envelope(result: CommandResult) -> Result<Envelope<Value>, CliError> {
    let mut meta = EnvelopeMeta::new(
        Uuid::new_v4().to_string(),
        SCHEMA_VERSION,
        result.entity_count,
    )?;
    for warning in result.warnings {
        meta.push_warning(warning);
    }

    let mut envelope = Envelope::success(meta, result.data);
    for error in result.errors {
        envelope.push_error(error)?;
    }
    Ok(envelope)
}
