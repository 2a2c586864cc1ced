use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{CoreError, EntityId, TradingDate, ValidationError};

/// One trading day of one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: TradingDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adjusted_close: f64,
    pub volume: f64,
}

impl Bar {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        date: TradingDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        adjusted_close: f64,
        volume: f64,
    ) -> Result<Self, ValidationError> {
        let bar = Self {
            date,
            open,
            high,
            low,
            close,
            adjusted_close,
            volume,
        };
        bar.validate()?;
        Ok(bar)
    }

    /// Checks the OHLC ordering invariants. Never repairs the bar.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_finite("open", self.open)?;
        validate_finite("high", self.high)?;
        validate_finite("low", self.low)?;
        validate_finite("close", self.close)?;
        validate_finite("adjusted_close", self.adjusted_close)?;
        validate_finite("volume", self.volume)?;
        if self.volume < 0.0 {
            return Err(ValidationError::NegativeValue { field: "volume" });
        }

        if self.high < self.low {
            return Err(ValidationError::InvalidBarRange);
        }
        if self.open.min(self.close) < self.low {
            return Err(ValidationError::OpenCloseBelowLow);
        }
        if self.open.max(self.close) > self.high {
            return Err(ValidationError::OpenCloseAboveHigh);
        }

        Ok(())
    }

    /// Seconds since the Unix epoch at UTC midnight of the bar's date.
    pub fn posix_timestamp(&self) -> i64 {
        self.date.posix_timestamp()
    }

    /// Mean of open and close.
    pub fn midprice(&self) -> f64 {
        (self.open + self.close) / 2.0
    }

    /// Intraday move, `close - open`.
    pub fn gap(&self) -> f64 {
        self.close - self.open
    }
}

/// Unparsed bar fields as handed over by a loader.
///
/// A record with a blank `date` means the entity did not trade that day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BarRecord {
    pub date: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub adjusted_close: String,
    pub volume: String,
}

impl BarRecord {
    /// Builds a record from positional fields in
    /// `date, open, high, low, close, adjusted close, volume` order.
    /// Missing trailing fields are left blank.
    pub fn from_fields<'a>(fields: impl IntoIterator<Item = &'a str>) -> Self {
        let mut fields = fields.into_iter().map(str::to_owned);
        let mut next = || fields.next().unwrap_or_default();
        Self {
            date: next(),
            open: next(),
            high: next(),
            low: next(),
            close: next(),
            adjusted_close: next(),
            volume: next(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.date.trim().is_empty()
    }

    pub fn parse(&self) -> Result<Bar, ValidationError> {
        Bar::new(
            TradingDate::parse(&self.date)?,
            parse_number("open", &self.open)?,
            parse_number("high", &self.high)?,
            parse_number("low", &self.low)?,
            parse_number("close", &self.close)?,
            parse_number("adjusted_close", &self.adjusted_close)?,
            parse_number("volume", &self.volume)?,
        )
    }
}

/// Validated, date-ascending bar history of one entity.
///
/// Bars are fixed at construction; there is no way to mutate them afterwards,
/// so anything derived from a series may be cached by its [`EntityId`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    name: String,
    id: EntityId,
    bars: Vec<Bar>,
}

impl Series {
    /// Sorts `bars` by date and checks every bar. Fails on the first invalid
    /// or duplicated bar.
    pub fn new(name: impl Into<String>, id: EntityId, mut bars: Vec<Bar>) -> Result<Self, CoreError> {
        bars.sort_by(|left, right| left.date.cmp(&right.date));

        let integrity = |source| CoreError::DataIntegrity {
            entity: id.clone(),
            source,
        };

        for bar in &bars {
            bar.validate().map_err(integrity)?;
        }
        if let Some(pair) = bars.windows(2).find(|pair| pair[0].date == pair[1].date) {
            return Err(integrity(ValidationError::DuplicateDate { date: pair[0].date }));
        }

        tracing::debug!(entity = %id, bars = bars.len(), "series validated");

        Ok(Self {
            name: name.into(),
            id,
            bars,
        })
    }

    /// Parses loader records. Blank records are skipped, any other record
    /// that fails to parse or validate rejects the whole series.
    pub fn build(
        name: impl Into<String>,
        id: EntityId,
        records: impl IntoIterator<Item = BarRecord>,
    ) -> Result<Self, CoreError> {
        let mut bars = Vec::new();
        let mut skipped = 0_usize;
        for record in records {
            if record.is_blank() {
                skipped += 1;
                continue;
            }
            let bar = record.parse().map_err(|source| CoreError::DataIntegrity {
                entity: id.clone(),
                source,
            })?;
            bars.push(bar);
        }

        if skipped > 0 {
            tracing::trace!(entity = %id, skipped, "skipped blank records");
        }

        Self::new(name, id, bars)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> Option<TradingDate> {
        self.bars.first().map(|bar| bar.date)
    }

    pub fn last_date(&self) -> Option<TradingDate> {
        self.bars.last().map(|bar| bar.date)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    /// Position of the first bar dated on or after `date`.
    pub fn position_at_or_after(&self, date: TradingDate) -> Option<usize> {
        let position = self.bars.partition_point(|bar| bar.date < date);
        (position < self.bars.len()).then_some(position)
    }

    /// Position of the first bar dated strictly after `date`.
    pub fn position_after(&self, date: TradingDate) -> Option<usize> {
        let position = self.bars.partition_point(|bar| bar.date <= date);
        (position < self.bars.len()).then_some(position)
    }

    /// Bars with `from <= date <= to`.
    pub fn bars_between(&self, from: TradingDate, to: TradingDate) -> &[Bar] {
        let start = self.bars.partition_point(|bar| bar.date < from);
        let end = self.bars.partition_point(|bar| bar.date <= to);
        if start >= end {
            return &[];
        }
        &self.bars[start..end]
    }

    /// Midprice per date for bars strictly inside `(left, right)`.
    pub fn midprices_inside(&self, left: TradingDate, right: TradingDate) -> BTreeMap<TradingDate, f64> {
        self.bars
            .iter()
            .filter(|bar| left < bar.date && bar.date < right)
            .map(|bar| (bar.date, bar.midprice()))
            .collect()
    }

    pub fn summary(&self) -> SeriesSummary {
        SeriesSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            bar_count: self.bars.len(),
            first_date: self.first_date(),
            last_date: self.last_date(),
        }
    }
}

/// Lightweight description of a loaded series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub id: EntityId,
    pub name: String,
    pub bar_count: usize,
    pub first_date: Option<TradingDate>,
    pub last_date: Option<TradingDate>,
}

fn validate_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    Ok(())
}

fn parse_number(field: &'static str, value: &str) -> Result<f64, ValidationError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| ValidationError::UnparsableField {
            field,
            value: value.to_owned(),
        })
}
