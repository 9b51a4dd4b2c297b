//! Calendar periods ("date repeats").
//!
//! Textual form: `P{years}Y{months}M{days}D{hours}h{minutes}n{seconds}s`,
//! e.g. `P1Y2M3D4h5n6.5s`. Components may be omitted when zero.

use std::fmt;
use std::str::FromStr;

use nom::{
    IResult,
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res, opt, recognize},
    number::complete::double,
    sequence::{pair, terminated, tuple},
};

use crate::error::{CompileError, CompileResult};

/// A calendar period, unlike a duration it has no fixed length in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DateRepeat {
    pub years: i32,
    pub months: i32,
    pub days: i32,
    pub hours: i32,
    pub minutes: i32,
    pub seconds: f64,
}

impl DateRepeat {
    pub fn new(years: i32, months: i32, days: i32, hours: i32, minutes: i32, seconds: f64) -> Self {
        Self {
            years,
            months,
            days,
            hours,
            minutes,
            seconds,
        }
    }

    pub fn years(n: i32) -> Self {
        Self {
            years: n,
            ..Self::default()
        }
    }

    pub fn months(n: i32) -> Self {
        Self {
            months: n,
            ..Self::default()
        }
    }

    pub fn days(n: i32) -> Self {
        Self {
            days: n,
            ..Self::default()
        }
    }

    pub fn hours(n: i32) -> Self {
        Self {
            hours: n,
            ..Self::default()
        }
    }

    pub fn minutes(n: i32) -> Self {
        Self {
            minutes: n,
            ..Self::default()
        }
    }

    pub fn seconds(n: f64) -> Self {
        Self {
            seconds: n,
            ..Self::default()
        }
    }

    /// Component-wise sum.
    pub fn plus(self, other: DateRepeat) -> Self {
        Self {
            years: self.years + other.years,
            months: self.months + other.months,
            days: self.days + other.days,
            hours: self.hours + other.hours,
            minutes: self.minutes + other.minutes,
            seconds: self.seconds + other.seconds,
        }
    }

    pub fn negate(self) -> Self {
        Self {
            years: -self.years,
            months: -self.months,
            days: -self.days,
            hours: -self.hours,
            minutes: -self.minutes,
            seconds: -self.seconds,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.years == 0
            && self.months == 0
            && self.days == 0
            && self.hours == 0
            && self.minutes == 0
            && self.seconds == 0.0
    }

    /// Check the value can be written as SQL.
    pub fn validate(&self) -> CompileResult<()> {
        if !self.seconds.is_finite() {
            return Err(CompileError::InvalidValue(format!(
                "date repeat seconds must be finite, got {}",
                self.seconds
            )));
        }
        Ok(())
    }
}

impl fmt::Display for DateRepeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "P{}Y{}M{}D{}h{}n{}s",
            self.years, self.months, self.days, self.hours, self.minutes, self.seconds
        )
    }
}

fn component(suffix: char) -> impl FnMut(&str) -> IResult<&str, i32> {
    move |input| {
        terminated(
            map_res(recognize(pair(opt(char('-')), digit1)), str::parse::<i32>),
            char(suffix),
        )(input)
    }
}

fn date_repeat(input: &str) -> IResult<&str, DateRepeat> {
    let (input, _) = char('P')(input)?;
    let (input, (years, months, days, hours, minutes, seconds)) = tuple((
        opt(component('Y')),
        opt(component('M')),
        opt(component('D')),
        opt(component('h')),
        opt(component('n')),
        opt(terminated(double, char('s'))),
    ))(input)?;
    Ok((
        input,
        DateRepeat {
            years: years.unwrap_or(0),
            months: months.unwrap_or(0),
            days: days.unwrap_or(0),
            hours: hours.unwrap_or(0),
            minutes: minutes.unwrap_or(0),
            seconds: seconds.unwrap_or(0.0),
        },
    ))
}

impl FromStr for DateRepeat {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (_, repeat) = all_consuming(date_repeat)(s.trim())
            .map_err(|_| CompileError::InvalidValue(format!("malformed date repeat '{}'", s)))?;
        repeat.validate()?;
        Ok(repeat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let r = DateRepeat::new(1, 2, 3, 4, 5, 6.5);
        assert_eq!(r.to_string(), "P1Y2M3D4h5n6.5s");
        assert_eq!(DateRepeat::days(2).to_string(), "P0Y0M2D0h0n0s");
    }

    #[test]
    fn test_parse_full_and_partial() {
        let r: DateRepeat = "P1Y2M3D4h5n6.5s".parse().unwrap();
        assert_eq!(r, DateRepeat::new(1, 2, 3, 4, 5, 6.5));

        let r: DateRepeat = "P-2D".parse().unwrap();
        assert_eq!(r, DateRepeat::days(-2));

        let r: DateRepeat = "P".parse().unwrap();
        assert!(r.is_zero());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("1Y".parse::<DateRepeat>().is_err());
        assert!("P1X".parse::<DateRepeat>().is_err());
        assert!("P1D2Y".parse::<DateRepeat>().is_err());
    }

    #[test]
    fn test_display_parses_back() {
        let r = DateRepeat::new(0, 14, -1, 0, 30, 0.25);
        let parsed: DateRepeat = r.to_string().parse().unwrap();
        assert_eq!(parsed, r);
    }

    #[test]
    fn test_plus_and_negate() {
        let r = DateRepeat::years(1).plus(DateRepeat::months(3));
        assert_eq!(r, DateRepeat::new(1, 3, 0, 0, 0, 0.0));
        assert_eq!(r.negate().plus(r), DateRepeat::default());
    }
}
