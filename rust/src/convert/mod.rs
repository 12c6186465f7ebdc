//! String-to-time converters and the registry that collects them.
//! Parsing itself is delegated to `chrono`; this module only adapts its
//! results to a common value type so a host can look converters up by target.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use thiserror::Error;
use tracing::info;

pub mod parsers;

pub use parsers::{
    IsoDateParser, IsoInstantParser, IsoLocalDateParser, IsoLocalDateTimeParser,
    IsoLocalTimeParser, LocalDateParser,
};

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("cannot convert {input:?} to {target}: {reason}")]
    Invalid {
        target: TemporalKind,
        input: String,
        #[source]
        reason: chrono::ParseError,
    },
    #[error("no converter registered for {0}")]
    NoConverter(TemporalKind),
}

/// The target types a converter can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalKind {
    Instant,
    Date,
    LocalDate,
    LocalDateTime,
    LocalTime,
}

impl TemporalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemporalKind::Instant => "instant",
            TemporalKind::Date => "date",
            TemporalKind::LocalDate => "local-date",
            TemporalKind::LocalDateTime => "local-date-time",
            TemporalKind::LocalTime => "local-time",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        [
            TemporalKind::Instant,
            TemporalKind::Date,
            TemporalKind::LocalDate,
            TemporalKind::LocalDateTime,
            TemporalKind::LocalTime,
        ]
        .into_iter()
        .find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for TemporalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A converted value, tagged with the kind that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temporal {
    Instant(DateTime<Utc>),
    Date(DateTime<Utc>),
    LocalDate(NaiveDate),
    LocalDateTime(NaiveDateTime),
    LocalTime(NaiveTime),
}

impl Temporal {
    pub fn kind(&self) -> TemporalKind {
        match self {
            Temporal::Instant(_) => TemporalKind::Instant,
            Temporal::Date(_) => TemporalKind::Date,
            Temporal::LocalDate(_) => TemporalKind::LocalDate,
            Temporal::LocalDateTime(_) => TemporalKind::LocalDateTime,
            Temporal::LocalTime(_) => TemporalKind::LocalTime,
        }
    }
}

impl fmt::Display for Temporal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Temporal::Instant(v) | Temporal::Date(v) => write!(f, "{}", v.to_rfc3339()),
            Temporal::LocalDate(v) => write!(f, "{v}"),
            Temporal::LocalDateTime(v) => write!(f, "{}", v.format("%Y-%m-%dT%H:%M:%S%.f")),
            Temporal::LocalTime(v) => write!(f, "{v}"),
        }
    }
}

/// Typed string converter.
pub trait Converter: Send + Sync {
    type Output;

    /// Short type name, used when logging registrations.
    fn name(&self) -> &'static str;

    fn target(&self) -> TemporalKind;

    fn convert(&self, source: &str) -> Result<Self::Output, ConvertError>;

    /// Lifts a typed result into [`Temporal`]; `None` means "no value".
    fn to_temporal(output: Self::Output) -> Option<Temporal>
    where
        Self: Sized;
}

/// Object-safe view of a [`Converter`] so heterogeneous converters can share
/// one collection.
pub trait DynConverter: Send + Sync {
    fn name(&self) -> &'static str;

    fn target(&self) -> TemporalKind;

    fn convert_temporal(&self, source: &str) -> Result<Option<Temporal>, ConvertError>;
}

impl<C: Converter> DynConverter for C {
    fn name(&self) -> &'static str {
        Converter::name(self)
    }

    fn target(&self) -> TemporalKind {
        Converter::target(self)
    }

    fn convert_temporal(&self, source: &str) -> Result<Option<Temporal>, ConvertError> {
        self.convert(source).map(C::to_temporal)
    }
}

/// An explicitly assembled, ordered set of converters.
///
/// When several converters produce the same kind, the one registered last
/// wins.
pub struct ConverterSet {
    converters: Vec<Box<dyn DynConverter>>,
}

impl ConverterSet {
    pub fn new(converters: Vec<Box<dyn DynConverter>>) -> Self {
        let set = Self { converters };
        info!("Register customized converters: {}", set.names().join(", "));
        set
    }

    /// All built-in converters. The lenient [`LocalDateParser`] comes after
    /// [`IsoLocalDateParser`] and therefore handles local dates.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(IsoInstantParser),
            Box::new(IsoDateParser),
            Box::new(IsoLocalDateParser),
            Box::new(IsoLocalDateTimeParser),
            Box::new(IsoLocalTimeParser),
            Box::new(LocalDateParser),
        ])
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.converters.iter().map(|c| c.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    pub fn converter_for(&self, target: TemporalKind) -> Option<&dyn DynConverter> {
        self.converters
            .iter()
            .rev()
            .find(|c| c.target() == target)
            .map(|c| &**c)
    }

    pub fn convert(
        &self,
        target: TemporalKind,
        source: &str,
    ) -> Result<Option<Temporal>, ConvertError> {
        self.converter_for(target)
            .ok_or(ConvertError::NoConverter(target))?
            .convert_temporal(source)
    }
}

impl fmt::Debug for ConverterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterSet")
            .field("converters", &self.names())
            .finish()
    }
}
