use std::collections::BTreeSet;
use std::fmt;
use std::ops::Range;
use std::ops::RangeFrom;
use std::ops::RangeInclusive;
use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectorError {
    #[error("Empty run selector")]
    Empty,

    #[error("Invalid run number '{0}' in run selector")]
    InvalidNumber(String),

    #[error("Run numbers are 1-based, 0 never runs")]
    ZeroIndex,

    #[error("Run selector range {start}..{end} ends before it starts")]
    ReversedRange { start: u64, end: u64 },
}

/// Describes at which runs of a call site output is produced. Runs are
/// counted from 1.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RunSelector {
    /// Prints once, exactly on the given run.
    Exact(u64),

    /// Prints on every run in the set.
    Set(BTreeSet<u64>),

    /// Prints on every run from `start` up to `end`, where `end` is only part
    /// of the range when `inclusive` holds.
    Bounded { start: u64, end: u64, inclusive: bool },

    /// Prints on every run from `start` onwards.
    Unbounded { start: u64 },
}

impl RunSelector {
    /// Returns true iff the given run number should print.
    pub fn matches(&self, run_number: u64) -> bool {
        match self {
            RunSelector::Exact(n) => run_number == *n,
            RunSelector::Set(runs) => runs.contains(&run_number),
            RunSelector::Bounded { start, end, inclusive } => {
                if *inclusive {
                    (*start..=*end).contains(&run_number)
                } else {
                    (*start..*end).contains(&run_number)
                }
            }
            RunSelector::Unbounded { start } => run_number >= *start,
        }
    }

    /// Returns true iff no run number after `run_number` can match anymore.
    pub fn is_exhausted(&self, run_number: u64) -> bool {
        match self {
            RunSelector::Exact(n) => run_number >= *n,
            RunSelector::Set(runs) => runs.last().is_none_or(|last| run_number >= *last),
            RunSelector::Bounded { end, inclusive, .. } => {
                if *inclusive {
                    run_number >= *end
                } else {
                    run_number.saturating_add(1) >= *end
                }
            }
            RunSelector::Unbounded { .. } => false,
        }
    }
}

/// Parses a single 1-based run number.
fn parse_run(text: &str) -> Result<u64, SelectorError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(SelectorError::Empty);
    }

    let run: u64 = text
        .parse()
        .map_err(|_| SelectorError::InvalidNumber(text.to_string()))?;
    if run == 0 {
        return Err(SelectorError::ZeroIndex);
    }

    Ok(run)
}

/// Parses the end of a range, where `None` means the range is unbounded.
///
/// Accepts an empty end (`3..`) and the `-1` sentinel (`3..-1`) that older
/// configuration files use for ranges without an end.
fn parse_range_end(text: &str) -> Result<Option<u64>, SelectorError> {
    let text = text.trim();
    if text.is_empty() || text == "-1" {
        Ok(None)
    } else {
        parse_run(text).map(Some)
    }
}

impl FromStr for RunSelector {
    type Err = SelectorError;

    /// Parses one of the following forms:
    ///     `2`          exactly the second run
    ///     `1,3` `[1, 3]` the first and third run
    ///     `3..6` `3...6` runs three up to (excluding) six
    ///     `3..=5`      runs three up to (including) five
    ///     `3..` `3..-1`  run three onwards
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let text = text
            .strip_prefix('[')
            .and_then(|inner| inner.strip_suffix(']'))
            .unwrap_or(text);

        if text.trim().is_empty() {
            return Err(SelectorError::Empty);
        }

        if text.contains(',') {
            let runs = text
                .split(',')
                .filter(|part| !part.trim().is_empty())
                .map(parse_run)
                .collect::<Result<BTreeSet<u64>, _>>()?;
            return Ok(RunSelector::Set(runs));
        }

        if let Some(index) = text.find("..") {
            let start = parse_run(&text[..index])?;
            let rest = &text[index + 2..];

            // Order matters, `...` and `..=` both start with a character that `..` would leave behind.
            let (end_text, inclusive) = if let Some(end) = rest.strip_prefix('=') {
                (end, true)
            } else if let Some(end) = rest.strip_prefix('.') {
                (end, false)
            } else {
                (rest, false)
            };

            return match parse_range_end(end_text)? {
                None => Ok(RunSelector::Unbounded { start }),
                Some(end) if end < start => Err(SelectorError::ReversedRange { start, end }),
                Some(end) => Ok(RunSelector::Bounded { start, end, inclusive }),
            };
        }

        parse_run(text).map(RunSelector::Exact)
    }
}

impl fmt::Display for RunSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunSelector::Exact(n) => write!(f, "{n}"),
            RunSelector::Set(runs) => {
                let mut first = true;
                for run in runs {
                    if !first {
                        write!(f, ",")?;
                    }
                    write!(f, "{run}")?;
                    first = false;
                }
                Ok(())
            }
            RunSelector::Bounded { start, end, inclusive } => {
                if *inclusive {
                    write!(f, "{start}..={end}")
                } else {
                    write!(f, "{start}..{end}")
                }
            }
            RunSelector::Unbounded { start } => write!(f, "{start}.."),
        }
    }
}

impl From<u64> for RunSelector {
    fn from(run: u64) -> Self {
        RunSelector::Exact(run)
    }
}

impl From<Vec<u64>> for RunSelector {
    fn from(runs: Vec<u64>) -> Self {
        RunSelector::Set(runs.into_iter().collect())
    }
}

impl<const N: usize> From<[u64; N]> for RunSelector {
    fn from(runs: [u64; N]) -> Self {
        RunSelector::Set(runs.into_iter().collect())
    }
}

impl From<BTreeSet<u64>> for RunSelector {
    fn from(runs: BTreeSet<u64>) -> Self {
        RunSelector::Set(runs)
    }
}

impl From<Range<u64>> for RunSelector {
    fn from(range: Range<u64>) -> Self {
        RunSelector::Bounded {
            start: range.start,
            end: range.end,
            inclusive: false,
        }
    }
}

impl From<RangeInclusive<u64>> for RunSelector {
    fn from(range: RangeInclusive<u64>) -> Self {
        let (start, end) = range.into_inner();
        RunSelector::Bounded {
            start,
            end,
            inclusive: true,
        }
    }
}

impl From<RangeFrom<u64>> for RunSelector {
    fn from(range: RangeFrom<u64>) -> Self {
        RunSelector::Unbounded { start: range.start }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn runs(selector: &RunSelector, count: u64) -> Vec<bool> {
        (1..=count).map(|run| selector.matches(run)).collect()
    }

    #[test]
    fn test_exact_matches_once() {
        assert_eq!(runs(&RunSelector::Exact(2), 3), vec![false, true, false]);
    }

    #[test]
    fn test_set_matches_members() {
        assert_eq!(runs(&RunSelector::from([1, 3]), 4), vec![true, false, true, false]);
    }

    #[test]
    fn test_inclusive_range() {
        assert_eq!(
            runs(&RunSelector::from(3..=5), 6),
            vec![false, false, true, true, true, false]
        );
    }

    #[test]
    fn test_exclusive_range() {
        assert_eq!(
            runs(&RunSelector::from(3..6), 7),
            vec![false, false, true, true, true, false, false]
        );
    }

    #[test]
    fn test_unbounded_range() {
        let selector = RunSelector::from(3..);
        assert_eq!(runs(&selector, 5), vec![false, false, true, true, true]);
        assert!(selector.matches(10_000));
        assert!(!selector.is_exhausted(u64::MAX));
    }

    #[test_case("2", RunSelector::Exact(2) ; "exact")]
    #[test_case(" 7 ", RunSelector::Exact(7) ; "exact with whitespace")]
    #[test_case("1,3", RunSelector::from([1, 3]) ; "set")]
    #[test_case("[1, 3, 5]", RunSelector::from([1, 3, 5]) ; "set with brackets")]
    #[test_case("3..6", RunSelector::from(3..6) ; "exclusive range")]
    #[test_case("3...6", RunSelector::from(3..6) ; "exclusive range with three dots")]
    #[test_case("3..=5", RunSelector::from(3..=5) ; "inclusive range")]
    #[test_case("3..", RunSelector::from(3..) ; "open range")]
    #[test_case("3..-1", RunSelector::from(3..) ; "open range with sentinel")]
    #[test_case("3...-1", RunSelector::from(3..) ; "exclusive open range with sentinel")]
    fn test_parse(text: &str, expected: RunSelector) {
        assert_eq!(text.parse::<RunSelector>(), Ok(expected));
    }

    #[test_case("", SelectorError::Empty ; "empty")]
    #[test_case("[]", SelectorError::Empty ; "empty brackets")]
    #[test_case("0", SelectorError::ZeroIndex ; "zero")]
    #[test_case("1,0", SelectorError::ZeroIndex ; "zero in set")]
    #[test_case("two", SelectorError::InvalidNumber("two".to_string()) ; "not a number")]
    #[test_case("..5", SelectorError::Empty ; "missing start")]
    #[test_case("5..3", SelectorError::ReversedRange { start: 5, end: 3 } ; "reversed")]
    fn test_parse_error(text: &str, expected: SelectorError) {
        assert_eq!(text.parse::<RunSelector>(), Err(expected));
    }

    #[test]
    fn test_display_parses_back() {
        for selector in [
            RunSelector::Exact(4),
            RunSelector::from([2, 8]),
            RunSelector::from(1..4),
            RunSelector::from(2..=9),
            RunSelector::from(5..),
        ] {
            assert_eq!(selector.to_string().parse::<RunSelector>(), Ok(selector));
        }
    }

    #[test]
    fn test_is_exhausted() {
        assert!(!RunSelector::Exact(2).is_exhausted(1));
        assert!(RunSelector::Exact(2).is_exhausted(2));
        assert!(RunSelector::from(3..6).is_exhausted(5));
        assert!(!RunSelector::from(3..=6).is_exhausted(5));
        assert!(RunSelector::from([1, 3]).is_exhausted(3));
        assert!(RunSelector::from(3..u64::MAX).is_exhausted(u64::MAX));
        assert!(!RunSelector::from(3..u64::MAX).is_exhausted(u64::MAX - 2));
    }
}
