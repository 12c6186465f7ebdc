//! Built-in converters. Each one trims its input and hands it to `chrono`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use tracing::error;

use super::{ConvertError, Converter, Temporal, TemporalKind};

/// Separator combinations accepted by [`LocalDateParser`].
const LENIENT_DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%Y-%m/%d", "%Y/%m-%d"];

fn invalid(target: TemporalKind, input: &str, reason: chrono::ParseError) -> ConvertError {
    ConvertError::Invalid {
        target,
        input: input.to_string(),
        reason,
    }
}

/// RFC 3339 instants such as `2023-10-26T10:15:30.123Z`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsoInstantParser;

impl Converter for IsoInstantParser {
    type Output = DateTime<Utc>;

    fn name(&self) -> &'static str {
        "IsoInstantParser"
    }

    fn target(&self) -> TemporalKind {
        TemporalKind::Instant
    }

    fn convert(&self, source: &str) -> Result<DateTime<Utc>, ConvertError> {
        DateTime::parse_from_rfc3339(source.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| invalid(TemporalKind::Instant, source, e))
    }

    fn to_temporal(output: DateTime<Utc>) -> Option<Temporal> {
        Some(Temporal::Instant(output))
    }
}

/// Points in time given either as an RFC 3339 instant or as a bare date,
/// which is read as midnight UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsoDateParser;

impl Converter for IsoDateParser {
    type Output = DateTime<Utc>;

    fn name(&self) -> &'static str {
        "IsoDateParser"
    }

    fn target(&self) -> TemporalKind {
        TemporalKind::Date
    }

    fn convert(&self, source: &str) -> Result<DateTime<Utc>, ConvertError> {
        let text = source.trim();
        match DateTime::parse_from_rfc3339(text) {
            Ok(dt) => Ok(dt.with_timezone(&Utc)),
            Err(rfc_err) => text
                .parse::<NaiveDate>()
                .map(|date| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
                .map_err(|_| invalid(TemporalKind::Date, source, rfc_err)),
        }
    }

    fn to_temporal(output: DateTime<Utc>) -> Option<Temporal> {
        Some(Temporal::Date(output))
    }
}

/// ISO local dates, `2023-10-26`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsoLocalDateParser;

impl Converter for IsoLocalDateParser {
    type Output = NaiveDate;

    fn name(&self) -> &'static str {
        "IsoLocalDateParser"
    }

    fn target(&self) -> TemporalKind {
        TemporalKind::LocalDate
    }

    fn convert(&self, source: &str) -> Result<NaiveDate, ConvertError> {
        NaiveDate::parse_from_str(source.trim(), "%Y-%m-%d")
            .map_err(|e| invalid(TemporalKind::LocalDate, source, e))
    }

    fn to_temporal(output: NaiveDate) -> Option<Temporal> {
        Some(Temporal::LocalDate(output))
    }
}

/// ISO local date-times, `2023-10-26T10:15:30` with optional fraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsoLocalDateTimeParser;

impl Converter for IsoLocalDateTimeParser {
    type Output = NaiveDateTime;

    fn name(&self) -> &'static str {
        "IsoLocalDateTimeParser"
    }

    fn target(&self) -> TemporalKind {
        TemporalKind::LocalDateTime
    }

    fn convert(&self, source: &str) -> Result<NaiveDateTime, ConvertError> {
        NaiveDateTime::parse_from_str(source.trim(), "%Y-%m-%dT%H:%M:%S%.f")
            .map_err(|e| invalid(TemporalKind::LocalDateTime, source, e))
    }

    fn to_temporal(output: NaiveDateTime) -> Option<Temporal> {
        Some(Temporal::LocalDateTime(output))
    }
}

/// ISO local times, `10:15:30` with optional fraction, or `10:15`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsoLocalTimeParser;

impl Converter for IsoLocalTimeParser {
    type Output = NaiveTime;

    fn name(&self) -> &'static str {
        "IsoLocalTimeParser"
    }

    fn target(&self) -> TemporalKind {
        TemporalKind::LocalTime
    }

    fn convert(&self, source: &str) -> Result<NaiveTime, ConvertError> {
        let text = source.trim();
        NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
            .or_else(|err| NaiveTime::parse_from_str(text, "%H:%M").map_err(|_| err))
            .map_err(|e| invalid(TemporalKind::LocalTime, source, e))
    }

    fn to_temporal(output: NaiveTime) -> Option<Temporal> {
        Some(Temporal::LocalTime(output))
    }
}

/// Lenient local dates: `2017-01-01`, `2017-1-1`, `2017/01/01`, `2017/1/1`.
///
/// Blank input yields `None`. Unparseable input is logged and also yields
/// `None`, so this converter never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalDateParser;

impl LocalDateParser {
    /// Canonical output pattern.
    pub const ENCODE_PATTERN: &'static str = "%Y-%m-%d";

    pub fn format(date: &NaiveDate) -> String {
        date.format(Self::ENCODE_PATTERN).to_string()
    }
}

impl Converter for LocalDateParser {
    type Output = Option<NaiveDate>;

    fn name(&self) -> &'static str {
        "LocalDateParser"
    }

    fn target(&self) -> TemporalKind {
        TemporalKind::LocalDate
    }

    fn convert(&self, source: &str) -> Result<Option<NaiveDate>, ConvertError> {
        let text = source.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let parsed = LENIENT_DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok());
        if parsed.is_none() {
            error!("Invalid date format: {}", source);
        }
        Ok(parsed)
    }

    fn to_temporal(output: Option<NaiveDate>) -> Option<Temporal> {
        output.map(Temporal::LocalDate)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};
    use tracing::Level;

    use super::*;
    use crate::test_support::LogCapture;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_instants() {
        let instant = IsoInstantParser.convert("2023-10-26T10:15:30.123Z").unwrap();
        assert_eq!(instant.timestamp_millis(), 1_698_315_330_123);

        let shifted = IsoInstantParser.convert("2023-10-26T12:15:30+02:00").unwrap();
        assert_eq!(shifted.hour(), 10);
    }

    #[test]
    fn rejects_invalid_instants() {
        let err = IsoInstantParser.convert("yesterday").unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Invalid { target: TemporalKind::Instant, ref input, .. } if input == "yesterday"
        ));
    }

    #[test]
    fn date_accepts_instant_or_bare_date() {
        let full = IsoDateParser.convert("2023-10-26T10:15:30Z").unwrap();
        assert_eq!(full.hour(), 10);

        let bare = IsoDateParser.convert("2023-10-26").unwrap();
        assert_eq!(bare.date_naive(), ymd(2023, 10, 26));
        assert_eq!(bare.hour(), 0);

        assert!(IsoDateParser.convert("26/10/2023").is_err());
    }

    #[test]
    fn parses_local_date_time_and_time() {
        assert_eq!(IsoLocalDateParser.convert(" 2023-10-26 ").unwrap(), ymd(2023, 10, 26));
        assert!(IsoLocalDateParser.convert("2023-13-01").is_err());

        let dt = IsoLocalDateTimeParser.convert("2023-10-26T10:15:30").unwrap();
        assert_eq!((dt.year(), dt.hour(), dt.second()), (2023, 10, 30));
        let precise = IsoLocalDateTimeParser.convert("2023-10-26T10:15:30.250").unwrap();
        assert_eq!(precise.nanosecond(), 250_000_000);
        assert!(IsoLocalDateTimeParser.convert("2023-10-26").is_err());

        let time = IsoLocalTimeParser.convert("10:15:30").unwrap();
        assert_eq!((time.hour(), time.minute(), time.second()), (10, 15, 30));
        let short = IsoLocalTimeParser.convert("10:15").unwrap();
        assert_eq!((short.hour(), short.minute(), short.second()), (10, 15, 0));
        assert!(IsoLocalTimeParser.convert("25:00").is_err());
    }

    #[test]
    fn lenient_dates_accept_all_documented_forms() {
        for text in ["2017-01-01", "2017-1-1", "2017/01/01", "2017/1/1"] {
            assert_eq!(LocalDateParser.convert(text).unwrap(), Some(ymd(2017, 1, 1)), "{text}");
        }
        assert_eq!(LocalDateParser::format(&ymd(2017, 1, 1)), "2017-01-01");
    }

    #[test]
    fn lenient_dates_map_blank_and_invalid_to_none() {
        let logs = LogCapture::default();
        let _guard = logs.install();

        assert_eq!(LocalDateParser.convert("").unwrap(), None);
        assert_eq!(LocalDateParser.convert("   ").unwrap(), None);
        assert!(logs.is_empty());

        assert_eq!(LocalDateParser.convert("not a date").unwrap(), None);
        let events = logs.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, Level::ERROR);
        assert_eq!(events[0].message, "Invalid date format: not a date");
    }
}
