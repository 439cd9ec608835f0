//! Date and time utilities.

use std::{cmp::Ordering, fmt, marker::PhantomData};

use derive_more::{Debug, Display, Error};
use time::{
    format_description::{well_known::Rfc3339, BorrowedFormatItem},
    macros::format_description,
    UtcOffset,
};

/// [ISO 8601] calendar date format (`YYYY-MM-DD`).
///
/// [ISO 8601]: https://wikipedia.org/wiki/ISO_8601
const ISO_DATE: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]");

/// Human-readable long date format (`18 October 2026`).
const LONG_DATE: &[BorrowedFormatItem<'_>] =
    format_description!("[day padding:none] [month repr:long] [year]");

/// Untyped date and time.
pub type DateTime = DateTimeOf;

/// UTC date and time.
#[derive(Debug)]
pub struct DateTimeOf<Of: ?Sized = ()> {
    /// Inner representation of the date and time.
    inner: time::OffsetDateTime,

    /// Type parameter describing the kind of date and time.
    #[debug(skip)]
    _of: PhantomData<Of>,
}

impl<Of: ?Sized> DateTimeOf<Of> {
    /// A [`DateTime`] representing the Unix epoch.
    pub const UNIX_EPOCH: Self = Self {
        inner: time::OffsetDateTime::UNIX_EPOCH,
        _of: PhantomData,
    };

    /// Creates a new [`DateTime`] from the provided [`UNIX_EPOCH`] timestamp
    /// in milliseconds.
    ///
    /// [`None`] is returned if the timestamp is out of range.
    ///
    /// [`UNIX_EPOCH`]: Self::UNIX_EPOCH
    #[must_use]
    pub fn from_unix_timestamp_millis(millis: i64) -> Option<Self> {
        Some(Self {
            inner: time::OffsetDateTime::from_unix_timestamp_nanos(
                i128::from(millis) * 1_000_000,
            )
            .ok()?,
            _of: PhantomData,
        })
    }

    /// Returns the [`UNIX_EPOCH`] timestamp of this [`DateTime`].
    ///
    /// [`UNIX_EPOCH`]: Self::UNIX_EPOCH
    #[must_use]
    pub fn unix_timestamp(&self) -> i64 {
        self.inner.unix_timestamp()
    }

    /// Creates a new [`DateTime`] from the provided [RFC 3339] string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid [RFC 3339] date and time.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub fn from_rfc3339(input: &str) -> Result<Self, ParseError> {
        let inner = time::OffsetDateTime::parse(input, &Rfc3339)
            .map_err(ParseError)?
            .to_offset(UtcOffset::UTC);
        Ok(Self {
            inner,
            _of: PhantomData,
        })
    }

    /// Returns the calendar [`Date`] part of this [`DateTime`].
    #[must_use]
    pub fn date<NewOf: ?Sized>(&self) -> DateOf<NewOf> {
        DateOf {
            inner: self.inner.date(),
            _of: PhantomData,
        }
    }
}

/// Untyped calendar date.
pub type Date = DateOf;

/// Calendar date without a time zone.
#[derive(Debug)]
pub struct DateOf<Of: ?Sized = ()> {
    /// Inner representation of the date.
    inner: time::Date,

    /// Type parameter describing the kind of date.
    #[debug(skip)]
    _of: PhantomData<Of>,
}

impl<Of: ?Sized> DateOf<Of> {
    /// Returns the current UTC calendar [`Date`].
    #[must_use]
    pub fn today() -> Self {
        Self {
            inner: time::OffsetDateTime::now_utc().date(),
            _of: PhantomData,
        }
    }

    /// Parses a [`Date`] from its [ISO 8601] `YYYY-MM-DD` representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid calendar date.
    ///
    /// [ISO 8601]: https://wikipedia.org/wiki/ISO_8601
    pub fn from_iso(input: &str) -> Result<Self, ParseError> {
        Ok(Self {
            inner: time::Date::parse(input, ISO_DATE).map_err(ParseError)?,
            _of: PhantomData,
        })
    }

    /// Parses a [`Date`] either from a `YYYY-MM-DD` string or from the date
    /// part of an [RFC 3339] date and time.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[must_use]
    pub fn parse_lenient(input: &str) -> Option<Self> {
        Self::from_iso(input).ok().or_else(|| {
            DateTime::from_rfc3339(input).ok().map(|dt| dt.date())
        })
    }

    /// Returns this [`Date`] as an [ISO 8601] `YYYY-MM-DD` string.
    ///
    /// [ISO 8601]: https://wikipedia.org/wiki/ISO_8601
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn to_iso(&self) -> String {
        self.inner.format(ISO_DATE).unwrap_or_else(|e| {
            panic!("cannot format `Date` as ISO 8601: {e}")
        })
    }

    /// Returns this [`Date`] in a long human-readable form, like
    /// `18 October 2026`.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn to_long(&self) -> String {
        self.inner.format(LONG_DATE).unwrap_or_else(|e| {
            panic!("cannot format `Date` in long form: {e}")
        })
    }
}

impl<Of: ?Sized> fmt::Display for DateOf<Of> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso())
    }
}

/// Error of parsing a [`DateTime`] or a [`Date`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("{_0}")]
pub struct ParseError(time::error::Parse);

impl<Of: ?Sized> Copy for DateTimeOf<Of> {}
impl<Of: ?Sized> Clone for DateTimeOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Eq for DateTimeOf<Of> {}
impl<Of: ?Sized> PartialEq for DateTimeOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<Of: ?Sized> Ord for DateTimeOf<Of> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<Of: ?Sized> PartialOrd for DateTimeOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Of: ?Sized> Copy for DateOf<Of> {}
impl<Of: ?Sized> Clone for DateOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Eq for DateOf<Of> {}
impl<Of: ?Sized> PartialEq for DateOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<Of: ?Sized> Ord for DateOf<Of> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<Of: ?Sized> PartialOrd for DateOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.

    use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

    use super::DateOf;

    impl<Of: ?Sized> Serialize for DateOf<Of> {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(&self.to_iso())
        }
    }

    impl<'de, Of: ?Sized> Deserialize<'de> for DateOf<Of> {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw = String::deserialize(deserializer)?;
            Self::from_iso(&raw).map_err(D::Error::custom)
        }
    }
}

#[cfg(test)]
mod spec {
    use super::{Date, DateTime};

    #[test]
    fn parses_iso_dates() {
        let date = Date::from_iso("2020-02-29").unwrap();
        assert_eq!(date.to_iso(), "2020-02-29");
        assert_eq!(date.to_long(), "29 February 2020");

        assert!(Date::from_iso("2021-02-29").is_err());
        assert!(Date::from_iso("29/02/2020").is_err());
        assert!(Date::from_iso("").is_err());
    }

    #[test]
    fn parses_dates_leniently() {
        assert_eq!(
            Date::parse_lenient("2019-05-01T10:20:30.000Z"),
            Some(Date::from_iso("2019-05-01").unwrap()),
        );
        assert_eq!(
            Date::parse_lenient("2019-05-01"),
            Some(Date::from_iso("2019-05-01").unwrap()),
        );
        assert_eq!(Date::parse_lenient("yesterday"), None);
    }

    #[test]
    fn converts_millisecond_timestamps() {
        let dt = DateTime::from_unix_timestamp_millis(1_700_000_000_123).unwrap();
        assert_eq!(dt.unix_timestamp(), 1_700_000_000);
        assert_eq!(dt.date::<()>().to_iso(), "2023-11-14");
        assert_eq!(
            DateTime::from_unix_timestamp_millis(0),
            Some(DateTime::UNIX_EPOCH),
        );
    }

    #[test]
    fn orders_dates() {
        let past = Date::from_iso("1999-12-31").unwrap();
        assert!(past < Date::today());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_dates_as_iso_strings() {
        let date = Date::from_iso("2001-09-10").unwrap();
        assert_eq!(
            serde_json::to_value(date).unwrap(),
            serde_json::json!("2001-09-10"),
        );
        let back: Date = serde_json::from_str("\"2001-09-10\"").unwrap();
        assert_eq!(back, date);
    }
}
