use anyhow::bail;
use chrono::format::{parse, ParseResult, Parsed, StrftimeItems};
use chrono::NaiveDateTime;
use itertools::Itertools;

use crate::error::{Error, Result};

/// A date time field that a pattern may leave out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Month,
    Day,
    Hour,
    Minute,
}

impl DateField {
    fn apply_default(self, parsed: &mut Parsed) -> ParseResult<()> {
        match self {
            DateField::Month => parsed.set_month(1),
            DateField::Day => parsed.set_day(1),
            DateField::Hour => parsed.set_hour(0),
            DateField::Minute => parsed.set_minute(0),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DatePattern {
    /// How the pattern is presented to users
    pub pattern: &'static str,
    format: &'static str,
    defaults: &'static [DateField],
}

impl DatePattern {
    pub const fn new(pattern: &'static str, format: &'static str, defaults: &'static [DateField]) -> Self {
        Self {
            pattern,
            format,
            defaults,
        }
    }

    /// Whether `s` has the exact layout of the pattern, a digit for every pattern letter and the same
    /// separators
    pub fn matches_layout(&self, s: &str) -> bool {
        s.len() == self.pattern.len()
            && s.bytes().zip(self.pattern.bytes()).all(|(c, p)| {
                if p.is_ascii_alphabetic() {
                    c.is_ascii_digit()
                } else {
                    c == p
                }
            })
    }

    /// Strict parse of the whole input, missing fields take their default (month and day 1, hour and minute 0)
    pub fn parse(&self, s: &str) -> anyhow::Result<NaiveDateTime> {
        if !self.matches_layout(s) {
            bail!("expected {}", self.pattern);
        }
        let mut parsed = Parsed::new();
        parse(&mut parsed, s, StrftimeItems::new(self.format))?;
        for field in self.defaults {
            field.apply_default(&mut parsed)?;
        }
        Ok(parsed.to_naive_datetime_with_offset(0)?)
    }

    pub fn format(&self, t: &NaiveDateTime) -> String { t.format(self.format).to_string() }
}

/// Most specific first
pub static DATE_PATTERNS: [DatePattern; 4] = [
    DatePattern::new("yyyy-MM-dd HH:mm", "%Y-%m-%d %H:%M", &[]),
    DatePattern::new("yyyy-MM-dd", "%Y-%m-%d", &[DateField::Hour, DateField::Minute]),
    DatePattern::new("yyyy-MM", "%Y-%m", &[DateField::Day, DateField::Hour, DateField::Minute]),
    DatePattern::new("yyyy", "%Y", &[
        DateField::Month,
        DateField::Day,
        DateField::Hour,
        DateField::Minute,
    ]),
];

/// Tries each pattern in order and keeps the first that parses
#[derive(Debug, Clone, Copy)]
pub struct DateTimeParser<'a> {
    patterns: &'a [DatePattern],
}

impl Default for DateTimeParser<'static> {
    fn default() -> Self { Self::new(&DATE_PATTERNS) }
}

impl<'a> DateTimeParser<'a> {
    /// `patterns` must be ordered by decreasing specificity
    pub fn new(patterns: &'a [DatePattern]) -> Self { Self { patterns } }

    pub fn patterns(&self) -> &'a [DatePattern] { self.patterns }

    /// "a, b, c and d"
    pub fn supported_formats(&self) -> String {
        match self.patterns.split_last() {
            None => String::new(),
            Some((last, [])) => last.pattern.to_string(),
            Some((last, rest)) => format!("{} and {}", rest.iter().map(|p| p.pattern).join(", "), last.pattern),
        }
    }

    /// A blank or missing value is absent, not an error. Other values are parsed as they are, surrounding
    /// whitespace included. `property` only decorates the error message.
    pub fn parse(&self, value: Option<&str>, property: Option<&str>) -> Result<Option<NaiveDateTime>> {
        let s = match value {
            Some(s) if !s.trim().is_empty() => s,
            _ => return Ok(None),
        };
        for pattern in self.patterns {
            match pattern.parse(s) {
                Ok(t) => {
                    trace!(value = s, pattern = pattern.pattern, "parsed date");
                    return Ok(Some(t));
                }
                Err(e) => trace!(value = s, pattern = pattern.pattern, "no match : {}", e),
            }
        }
        Err(Error::InvalidDateFormat {
            value: value.unwrap_or_default().to_string(),
            property: property.map(ToString::to_string),
            supported: self.supported_formats(),
        })
    }
}

/// Parses with the default patterns
pub fn parse_date_time(value: Option<&str>, property: Option<&str>) -> Result<Option<NaiveDateTime>> {
    DateTimeParser::default().parse(value, property)
}
