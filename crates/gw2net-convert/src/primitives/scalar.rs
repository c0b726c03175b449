//! Locale codes and timestamps

use chrono::{DateTime, Utc};

use gw2net_protocol::Locale;

use crate::converter::{Context, Converter};
use crate::error::Result;

/// Language code to [`Locale`]; unsupported codes become `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleConverter;

impl Converter<String, Option<Locale>> for LocaleConverter {
    fn convert(&self, source: String, _context: &Context) -> Result<Option<Locale>> {
        match source.parse() {
            Ok(locale) => Ok(Some(locale)),
            Err(_) => {
                tracing::warn!(code = source.as_str(), "unsupported language code");
                Ok(None)
            }
        }
    }
}

/// ISO-8601 timestamp (`2015-06-26T00:00:00Z`) to UTC.
///
/// Timestamps are identifying data, so a malformed value is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampConverter;

impl Converter<String, DateTime<Utc>> for TimestampConverter {
    fn convert(&self, source: String, _context: &Context) -> Result<DateTime<Utc>> {
        let parsed = DateTime::parse_from_rfc3339(source.trim())?;
        Ok(parsed.with_timezone(&Utc))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::ConvertError;
    use chrono::TimeZone;

    #[test]
    fn test_locale_codes() {
        let c = LocaleConverter;
        let context = Context::default();
        assert_eq!(
            c.convert("fr".to_string(), &context).expect("converts"),
            Some(Locale::French)
        );
        assert_eq!(c.convert("ko".to_string(), &context).expect("converts"), None);
    }

    #[test]
    fn test_timestamp_utc_and_offset() {
        let c = TimestampConverter;
        let context = Context::default();

        let utc = c
            .convert("2015-06-26T00:00:00Z".to_string(), &context)
            .expect("utc");
        assert_eq!(utc, Utc.with_ymd_and_hms(2015, 6, 26, 0, 0, 0).single().expect("valid"));

        let offset = c
            .convert("2015-06-26T02:00:00+02:00".to_string(), &context)
            .expect("offset");
        assert_eq!(offset, utc);
    }

    #[test]
    fn test_malformed_timestamp_is_error() {
        let result = TimestampConverter.convert("yesterday".to_string(), &Context::default());
        assert!(matches!(result, Err(ConvertError::Timestamp(_))));
    }
}
