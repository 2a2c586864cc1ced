//! Loading of grouped-column price files into validated [`Series`].
//!
//! A price file lays entities out side by side:
//!
//! ```text
//! Acme,,,,,,,,Globex,,,,,,,
//! Date,Open,High,Low,Close,Adj Close,Volume,,Date,Open,High,Low,Close,Adj Close,Volume,
//! 2010-01-04,10,12,9,11,11,1000,,2010-01-04,40,41,39,40.5,40.5,300,
//! ,,,,,,,,2010-01-05,40.5,42,40,41,41,250,
//! ```
//!
//! Row one names the entities and row two labels the fields of each group.
//! Every following row carries one fixed-width column group per entity. A
//! group with a blank date means the entity did not trade that day. A name
//! repeated within one file contributes all of its groups to the same series.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use chartx_core::{BarRecord, CoreError, EntityId, Series};
use thiserror::Error;

/// Columns per entity in the stock data files.
pub const DEFAULT_GROUP_WIDTH: usize = 8;

/// Fields a column group must provide for one bar.
const BAR_FIELDS: usize = 7;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("{path}: missing header row {row}")]
    MissingHeader { path: String, row: usize },

    #[error("group width {width} is smaller than the 7 bar fields")]
    GroupTooNarrow { width: usize },

    #[error("{path}: {source}")]
    InFile {
        path: String,
        #[source]
        source: Box<LoadError>,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl LoadError {
    fn in_file(path: &Path, source: LoadError) -> Self {
        Self::InFile {
            path: path.display().to_string(),
            source: Box::new(source),
        }
    }

    /// Innermost core error, if the failure came from series construction.
    pub fn core(&self) -> Option<&CoreError> {
        match self {
            Self::Core(error) => Some(error),
            Self::InFile { source, .. } => source.core(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataConfig {
    pub data_dir: PathBuf,
    pub extension: String,
    pub group_width: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: resolve_data_dir(),
            extension: String::from("csv"),
            group_width: DEFAULT_GROUP_WIDTH,
        }
    }
}

impl DataConfig {
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }
}

/// Everything found in a data directory, keyed by entity id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub entities: BTreeMap<EntityId, Series>,
    pub files: Vec<PathBuf>,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn into_series(self) -> impl Iterator<Item = Series> {
        self.entities.into_values()
    }
}

/// Parses one grouped-column file.
///
/// `path` only labels errors. Any entity with an invalid bar fails the whole
/// file. Entities come back in order of their first header cell.
pub fn parse_grouped_csv<R: Read>(
    reader: R,
    group_width: usize,
    path: &str,
) -> Result<Vec<Series>, LoadError> {
    if group_width < BAR_FIELDS {
        return Err(LoadError::GroupTooNarrow { width: group_width });
    }

    let mut rows = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader)
        .into_records();

    let missing = |row| LoadError::MissingHeader {
        path: path.to_owned(),
        row,
    };
    let names = rows.next().ok_or_else(|| missing(1))??;
    // Field labels; the bar layout is fixed, so they are not interpreted.
    rows.next().ok_or_else(|| missing(2))??;

    // Header cells are positional: group `n` owns columns `n * group_width ..`.
    let mut ids: Vec<EntityId> = Vec::new();
    let mut owners: Vec<usize> = Vec::new();
    for name in names.iter().filter(|name| !name.trim().is_empty()) {
        let id = EntityId::parse(name).map_err(CoreError::from)?;
        let slot = match ids.iter().position(|known| *known == id) {
            Some(slot) => {
                tracing::debug!(entity = %id, file = path, "merging repeated column group");
                slot
            }
            None => {
                ids.push(id);
                ids.len() - 1
            }
        };
        owners.push(slot);
    }

    let mut records: Vec<Vec<BarRecord>> = vec![Vec::new(); ids.len()];
    for row in rows {
        let row = row?;
        for (group, slot) in owners.iter().enumerate() {
            let start = group * group_width;
            let fields = (start..start + BAR_FIELDS)
                .map(|column| row.get(column).unwrap_or_default().trim());
            records[*slot].push(BarRecord::from_fields(fields));
        }
    }

    ids.into_iter()
        .zip(records)
        .map(|(id, records)| -> Result<_, LoadError> {
            let name = id.as_str().to_owned();
            Ok(Series::build(name, id, records)?)
        })
        .collect()
}

/// Files with `config.extension` directly inside `config.data_dir`, in lexical order.
pub fn discover_files(config: &DataConfig) -> Result<Vec<PathBuf>, LoadError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(&config.data_dir)? {
        let path = entry?.path();
        let matches = path
            .extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| extension.eq_ignore_ascii_case(&config.extension));
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Loads every data file of `config.data_dir`.
///
/// An entity appearing in a later file replaces the earlier one.
pub fn load_dir(config: &DataConfig) -> Result<Catalog, LoadError> {
    let files = discover_files(config)?;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        files = files.len(),
        "discovered data files"
    );

    let mut catalog = Catalog::default();
    for path in files {
        let file = fs::File::open(&path).map_err(|error| LoadError::in_file(&path, error.into()))?;
        let label = path.display().to_string();
        let loaded = parse_grouped_csv(file, config.group_width, &label)
            .map_err(|error| match error {
                LoadError::MissingHeader { .. } => error,
                other => LoadError::in_file(&path, other),
            })?;

        tracing::info!(file = %label, entities = loaded.len(), "loaded data file");
        for series in loaded {
            let id = series.id().clone();
            if catalog.entities.insert(id.clone(), series).is_some() {
                tracing::warn!(entity = %id, file = %label, "entity replaced by later file");
            }
        }
        catalog.files.push(path);
    }

    Ok(catalog)
}

fn resolve_data_dir() -> PathBuf {
    if let Some(dir) = env::var_os("CHARTX_DATA_DIR") {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    PathBuf::from("stockdata")
}
