// MIT/Apache2 License

use crate::util::{are_close, greater_than, greater_than_or_close};
use std::{cmp::Ordering, fmt};

/// A range along a stroke spine, expressed in fractional node indices.
///
/// A fractional index `i + f` lies on the spine between node `i` and node
/// `i + 1`. Two sentinels extend the range past either end of the stroke:
/// [`StrokeFIndices::BEFORE_FIRST`] and [`StrokeFIndices::AFTER_LAST`]. The
/// sentinels are the extreme finite values so that they never collide with a
/// real index.
#[derive(Debug, Copy, Clone)]
pub struct StrokeFIndices {
    begin: f64,
    end: f64,
}

impl StrokeFIndices {
    pub const BEFORE_FIRST: f64 = f64::MIN;
    pub const AFTER_LAST: f64 = f64::MAX;

    #[inline]
    pub const fn new(begin: f64, end: f64) -> Self {
        Self { begin, end }
    }

    /// Nothing of the stroke is covered.
    #[inline]
    pub const fn empty() -> Self {
        Self::new(Self::AFTER_LAST, Self::BEFORE_FIRST)
    }

    /// The entire stroke is covered.
    #[inline]
    pub const fn full() -> Self {
        Self::new(Self::BEFORE_FIRST, Self::AFTER_LAST)
    }

    #[inline]
    pub fn begin_findex(&self) -> f64 {
        self.begin
    }

    #[inline]
    pub fn set_begin_findex(&mut self, begin: f64) {
        self.begin = begin;
    }

    #[inline]
    pub fn end_findex(&self) -> f64 {
        self.end
    }

    #[inline]
    pub fn set_end_findex(&mut self, end: f64) {
        self.end = end;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        greater_than_or_close(self.begin, self.end)
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        are_close(self.begin, Self::BEFORE_FIRST) && are_close(self.end, Self::AFTER_LAST)
    }

    /// Whether the range starts before the first node.
    #[inline]
    pub fn begins_before_first(&self) -> bool {
        are_close(self.begin, Self::BEFORE_FIRST)
    }

    /// Whether the range ends after the last node.
    #[inline]
    pub fn ends_after_last(&self) -> bool {
        are_close(self.end, Self::AFTER_LAST)
    }

    /// Orders ranges by where they begin.
    #[inline]
    pub fn compare_to(&self, other: &StrokeFIndices) -> Ordering {
        if are_close(self.begin, other.begin) {
            Ordering::Equal
        } else if greater_than(self.begin, other.begin) {
            Ordering::Greater
        } else {
            Ordering::Less
        }
    }
}

impl Default for StrokeFIndices {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for StrokeFIndices {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        are_close(self.begin, other.begin) && are_close(self.end, other.end)
    }
}

pub(crate) fn fmt_findex(findex: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if are_close(findex, StrokeFIndices::BEFORE_FIRST) {
        f.write_str("BeforeFirst")
    } else if are_close(findex, StrokeFIndices::AFTER_LAST) {
        f.write_str("AfterLast")
    } else {
        write!(f, "{}", findex)
    }
}

impl fmt::Display for StrokeFIndices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        fmt_findex(self.begin, f)?;
        f.write_str(",")?;
        fmt_findex(self.end, f)?;
        f.write_str("}")
    }
}
