// MIT/Apache2 License

use crate::findices::{fmt_findex, StrokeFIndices};
use std::fmt;

/// How a stroke is split by a hit: the `hit_segment` is the part of the
/// stroke that was hit, and the `in_segment` the part of it lying inside a
/// lasso. Both are ranges of fractional node indices.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StrokeIntersection {
    hit_segment: StrokeFIndices,
    in_segment: StrokeFIndices,
}

impl StrokeIntersection {
    /// An intersection covering nothing.
    pub const EMPTY: StrokeIntersection = StrokeIntersection::new(
        StrokeFIndices::AFTER_LAST,
        StrokeFIndices::AFTER_LAST,
        StrokeFIndices::BEFORE_FIRST,
        StrokeFIndices::BEFORE_FIRST,
    );

    /// An intersection covering the whole stroke.
    pub const FULL: StrokeIntersection = StrokeIntersection::new(
        StrokeFIndices::BEFORE_FIRST,
        StrokeFIndices::BEFORE_FIRST,
        StrokeFIndices::AFTER_LAST,
        StrokeFIndices::AFTER_LAST,
    );

    /// The markers are given in the order they appear along the stroke.
    #[inline]
    pub const fn new(hit_begin: f64, in_begin: f64, in_end: f64, hit_end: f64) -> Self {
        Self {
            hit_segment: StrokeFIndices::new(hit_begin, hit_end),
            in_segment: StrokeFIndices::new(in_begin, in_end),
        }
    }

    #[inline]
    pub fn hit_begin(&self) -> f64 {
        self.hit_segment.begin_findex()
    }

    #[inline]
    pub fn set_hit_begin(&mut self, findex: f64) {
        self.hit_segment.set_begin_findex(findex);
    }

    #[inline]
    pub fn hit_end(&self) -> f64 {
        self.hit_segment.end_findex()
    }

    #[inline]
    pub fn set_hit_end(&mut self, findex: f64) {
        self.hit_segment.set_end_findex(findex);
    }

    #[inline]
    pub fn in_begin(&self) -> f64 {
        self.in_segment.begin_findex()
    }

    #[inline]
    pub fn set_in_begin(&mut self, findex: f64) {
        self.in_segment.set_begin_findex(findex);
    }

    #[inline]
    pub fn in_end(&self) -> f64 {
        self.in_segment.end_findex()
    }

    #[inline]
    pub fn set_in_end(&mut self, findex: f64) {
        self.in_segment.set_end_findex(findex);
    }

    #[inline]
    pub fn hit_segment(&self) -> StrokeFIndices {
        self.hit_segment
    }

    #[inline]
    pub fn in_segment(&self) -> StrokeFIndices {
        self.in_segment
    }

    /// Whether nothing of the stroke was hit.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hit_segment.is_empty()
    }
}

impl Default for StrokeIntersection {
    #[inline]
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for StrokeIntersection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        fmt_findex(self.hit_begin(), f)?;
        f.write_str(",")?;
        fmt_findex(self.in_begin(), f)?;
        f.write_str(",")?;
        fmt_findex(self.in_end(), f)?;
        f.write_str(",")?;
        fmt_findex(self.hit_end(), f)?;
        f.write_str("}")
    }
}

fn merged_segments<I: IntoIterator<Item = StrokeFIndices>>(segments: I) -> Vec<StrokeFIndices> {
    segments
        .into_iter()
        .filter(|segment| !segment.is_empty())
        .fold(Vec::new(), |mut merged, segment| {
            match merged.last_mut() {
                Some(previous) if previous.end_findex() >= segment.begin_findex() => {
                    previous.set_end_findex(segment.end_findex())
                }
                _ => merged.push(segment),
            }
            merged
        })
}

/// The non-empty inside ranges of ordered intersections, with touching
/// ranges merged.
#[inline]
pub fn in_segments(intersections: &[StrokeIntersection]) -> Vec<StrokeFIndices> {
    merged_segments(intersections.iter().map(StrokeIntersection::in_segment))
}

/// The non-empty hit ranges of ordered intersections, with touching ranges
/// merged.
#[inline]
pub fn hit_segments(intersections: &[StrokeIntersection]) -> Vec<StrokeFIndices> {
    merged_segments(intersections.iter().map(StrokeIntersection::hit_segment))
}

/// Remove the hit ranges of `mask` from the hit ranges of `intersections`.
///
/// Both lists are ordered along the stroke. An intersection cut in the
/// middle by the mask is split in two; one covered entirely is dropped.
pub fn masked_hit_segments(
    intersections: &[StrokeIntersection],
    mask: &[StrokeIntersection],
) -> Vec<StrokeIntersection> {
    let mut result = Vec::with_capacity(intersections.len());
    let mut first_mask = 0;

    for si in intersections {
        // masks ending before this intersection cannot touch later ones
        while first_mask < mask.len() && mask[first_mask].hit_end() <= si.hit_begin() {
            first_mask += 1;
        }

        let mut rest = *si;
        let mut covered = false;
        for m in mask[first_mask..]
            .iter()
            .take_while(|m| m.hit_begin() < si.hit_end())
        {
            if m.hit_begin() > rest.hit_begin() {
                let mut before = rest;
                before.set_hit_end(m.hit_begin());
                result.push(before);
            }
            if m.hit_end() >= rest.hit_end() {
                covered = true;
                break;
            }
            rest.set_hit_begin(rest.hit_begin().max(m.hit_end()));
        }

        if !covered {
            result.push(rest);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const AL: f64 = StrokeFIndices::AFTER_LAST;
    const BF: f64 = StrokeFIndices::BEFORE_FIRST;

    #[test]
    fn accessors() {
        let mut si = StrokeIntersection::new(1.0, 1.5, 2.0, 2.5);
        si.set_in_begin(1.25);
        si.set_hit_end(3.0);
        assert_eq!(si.hit_segment(), StrokeFIndices::new(1.0, 3.0));
        assert_eq!(si.in_segment(), StrokeFIndices::new(1.25, 2.0));
        assert!(!si.is_empty());

        assert!(StrokeIntersection::EMPTY.is_empty());
        assert!(StrokeIntersection::FULL.hit_segment().is_full());
        assert_eq!(StrokeIntersection::default(), StrokeIntersection::EMPTY);
    }

    #[test]
    fn display() {
        assert_eq!(
            StrokeIntersection::new(BF, 0.5, AL, 2.5).to_string(),
            "{BeforeFirst,0.5,AfterLast,2.5}"
        );
    }

    #[test]
    fn merging() {
        let intersections = [
            StrokeIntersection::new(0.0, AL, BF, 1.0),
            StrokeIntersection::new(1.0, AL, BF, 1.5),
            StrokeIntersection::new(2.0, AL, BF, 3.0),
            StrokeIntersection::EMPTY,
        ];
        assert_eq!(
            hit_segments(&intersections),
            vec![StrokeFIndices::new(0.0, 1.5), StrokeFIndices::new(2.0, 3.0)]
        );
        assert!(in_segments(&intersections).is_empty());

        let inside = [
            StrokeIntersection::new(0.0, 0.5, 1.0, 1.0),
            StrokeIntersection::new(0.0, 0.75, 2.0, 2.0),
        ];
        assert_eq!(in_segments(&inside), vec![StrokeFIndices::new(0.5, 2.0)]);
    }

    #[test]
    fn masking() {
        let intersections = [
            StrokeIntersection::new(0.0, AL, BF, 4.0),
            StrokeIntersection::new(5.0, AL, BF, 6.0),
            StrokeIntersection::new(7.0, AL, BF, 8.0),
        ];
        let mask = [
            StrokeIntersection::new(1.0, AL, BF, 2.0),
            StrokeIntersection::new(3.0, AL, BF, 5.5),
            StrokeIntersection::new(6.5, AL, BF, 9.0),
        ];

        let masked = masked_hit_segments(&intersections, &mask);
        let ranges: Vec<_> = masked.iter().map(|si| si.hit_segment()).collect();
        assert_eq!(
            ranges,
            vec![
                StrokeFIndices::new(0.0, 1.0),
                StrokeFIndices::new(2.0, 3.0),
                StrokeFIndices::new(5.5, 6.0),
            ]
        );

        assert_eq!(masked_hit_segments(&intersections, &[]), intersections.to_vec());
    }
}
