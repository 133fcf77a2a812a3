// 🏛️ Pillar Calculator - Four Pillars (四柱) from a Gregorian birth moment
//
// Year:  sexagenary index anchored at year 4 (甲子)
// Month: Gregorian month approximation of the solar terms (五虎遁 for the stem)
// Day:   day count from a fixed reference date
// Hour:  two-hour branches, 子 spanning 23:00-00:59 (五鼠遁 for the stem)
//
// All modulo operations use floor semantics (`rem_euclid`) so dates before the
// anchors still land inside the cycles.

use crate::error::{NamingError, Result};
use crate::symbols::{Branch, Stem, HOUR_START_STEMS, MONTH_START_STEMS};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Year whose pillar is 甲子 (cycle index 0)
pub const YEAR_CYCLE_ANCHOR: i64 = 4;

/// Day treated as 甲子 by the day pillar: 1900-01-31
pub const DAY_CYCLE_ANCHOR: (i32, u32, u32) = (1900, 1, 31);

// ============================================================================
// BIRTH MOMENT
// ============================================================================

/// Validated birth input: a real calendar date plus an hour in 0..24
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBirthMoment")]
pub struct BirthMoment {
    date: NaiveDate,
    hour: u32,
}

/// Wire shape of `BirthMoment`; deserialized values go back through `BirthMoment::new`
#[derive(Debug, Deserialize)]
struct RawBirthMoment {
    date: NaiveDate,
    hour: u32,
}

impl TryFrom<RawBirthMoment> for BirthMoment {
    type Error = NamingError;

    fn try_from(raw: RawBirthMoment) -> Result<Self> {
        BirthMoment::new(raw.date.year(), raw.date.month(), raw.date.day(), raw.hour)
    }
}

impl BirthMoment {
    /// Reject impossible dates and hours up front; nothing is clamped
    pub fn new(year: i32, month: u32, day: u32, hour: u32) -> Result<Self> {
        let invalid = NamingError::InvalidDate {
            year,
            month,
            day,
            hour,
        };

        if hour > 23 {
            return Err(invalid);
        }

        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or(invalid)?;
        Ok(BirthMoment { date, hour })
    }

    pub fn from_datetime(datetime: NaiveDateTime) -> Self {
        BirthMoment {
            date: datetime.date(),
            hour: datetime.hour(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }
}

// ============================================================================
// PILLAR & CHART
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pillar {
    pub stem: Stem,
    pub branch: Branch,
}

impl Pillar {
    pub fn new(stem: Stem, branch: Branch) -> Self {
        Pillar { stem, branch }
    }

    /// Pillar at a position of the 60-step cycle; the index is reduced first
    pub fn from_cycle_index(index: i64) -> Self {
        let idx = index.rem_euclid(60);
        Pillar {
            stem: Stem::from_index((idx % 10) as usize),
            branch: Branch::from_index((idx % 12) as usize),
        }
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.stem, self.branch)
    }
}

/// The four pillars of a birth moment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chart {
    pub year: Pillar,
    pub month: Pillar,
    pub day: Pillar,
    pub hour: Pillar,
}

impl Chart {
    pub fn pillars(&self) -> [Pillar; 4] {
        [self.year, self.month, self.day, self.hour]
    }

    /// The eight characters (八字): stem then branch of each pillar
    pub fn symbols(&self) -> [(Stem, Branch); 4] {
        self.pillars().map(|p| (p.stem, p.branch))
    }

    /// Zodiac animal of the year branch
    pub fn zodiac(&self) -> &'static str {
        self.year.branch.zodiac()
    }
}

impl fmt::Display for Chart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.year, self.month, self.day, self.hour)
    }
}

// ============================================================================
// PILLAR FUNCTIONS
// ============================================================================

/// Year pillar for any year; no range is special-cased
pub fn year_pillar(year: i32) -> Pillar {
    Pillar::from_cycle_index(year as i64 - YEAR_CYCLE_ANCHOR)
}

/// Month pillar from the Gregorian month (1-12) and the year stem
///
/// Gregorian months stand in for the solar-term months. The stem offset counts
/// from February (寅 month) while the branch maps December to 子 and every other
/// month to its own number, so January gets branch 丑 but stem offset 11.
///
/// # Panics
///
/// If `month` is outside 1-12. `calculate_chart` only passes validated months.
pub fn month_pillar(month: u32, year_stem: Stem) -> Pillar {
    debug_assert!((1..=12).contains(&month), "month {} outside 1-12", month);
    let start = MONTH_START_STEMS[year_stem.index() % 5];
    let offset = (month as i64 - 2).rem_euclid(12) as usize;
    let stem = Stem::from_index((start + offset) % 10);

    let branch = if month == 12 { 0 } else { month as usize };

    Pillar::new(stem, Branch::from_index(branch))
}

fn day_anchor() -> NaiveDate {
    let (y, m, d) = DAY_CYCLE_ANCHOR;
    NaiveDate::from_ymd_opt(y, m, d).expect("day anchor is a calendar date")
}

/// Whole days between the reference date and `date` (negative before it)
pub fn days_from_anchor(date: NaiveDate) -> i64 {
    date.signed_duration_since(day_anchor()).num_days()
}

pub fn day_pillar(date: NaiveDate) -> Pillar {
    Pillar::from_cycle_index(days_from_anchor(date))
}

/// Hour branch: 23:00-00:59 → 子, 01:00-02:59 → 丑, ...
pub fn hour_branch(hour: u32) -> Branch {
    Branch::from_index((((hour + 1) / 2) % 12) as usize)
}

pub fn hour_pillar(hour: u32, day_stem: Stem) -> Pillar {
    let branch = hour_branch(hour);
    let start = HOUR_START_STEMS[day_stem.index() % 5];
    let stem = Stem::from_index((start + branch.index()) % 10);
    Pillar::new(stem, branch)
}

/// Compute the full chart; a pure function of the birth moment
pub fn calculate_chart(birth: &BirthMoment) -> Chart {
    let year = year_pillar(birth.year());
    let month = month_pillar(birth.month(), year.stem);
    let day = day_pillar(birth.date());
    let hour = hour_pillar(birth.hour(), day.stem);

    let chart = Chart {
        year,
        month,
        day,
        hour,
    };
    tracing::debug!(date = %birth.date(), hour = birth.hour(), %chart, "computed chart");
    chart
}
