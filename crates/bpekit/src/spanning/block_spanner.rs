//! # Block Spanner

use core::ops::Range;

use crate::errors::BpeResult;
use crate::spanning::regex_wrapper::{SplitPattern, SplitRegex};

/// Span Label/Range Reference for [`BlockSpanner`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpanRef {
    /// A pattern-matched block.
    Word(Range<usize>),

    /// A stretch the pattern did not cover.
    ///
    /// Gaps are carried as blocks of their own so that the spans always
    /// cover the input and encoding is lossless.
    Gap(Range<usize>),
}

impl SpanRef {
    /// Get the span range.
    pub fn range(&self) -> &Range<usize> {
        match self {
            SpanRef::Word(range) => range,
            SpanRef::Gap(range) => range,
        }
    }
}

impl From<SpanRef> for Range<usize> {
    fn from(span: SpanRef) -> Self {
        span.range().clone()
    }
}

/// Splits text into non-overlapping byte blocks prior to training or
/// encoding.
///
/// Pair merges never cross block boundaries.
#[derive(Debug, Clone)]
pub struct BlockSpanner {
    /// The compiled split regex.
    regex: SplitRegex,
}

impl BlockSpanner {
    /// Compile a spanner from a [`SplitPattern`].
    pub fn from_pattern<P: Into<SplitPattern>>(pattern: P) -> BpeResult<Self> {
        Ok(Self {
            regex: pattern.into().compile()?,
        })
    }

    /// Get the source pattern.
    pub fn pattern_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Split text into [`SpanRef`]s covering the whole input in order.
    pub fn split_spans(
        &self,
        text: &str,
    ) -> BpeResult<Vec<SpanRef>> {
        let ranges = self.regex.find_ranges(text)?;

        let mut spans = Vec::with_capacity(ranges.len() + 1);
        let mut cursor = 0;
        for range in ranges {
            if range.start > cursor {
                spans.push(SpanRef::Gap(cursor..range.start));
            }
            cursor = range.end;
            spans.push(SpanRef::Word(range));
        }
        if cursor < text.len() {
            spans.push(SpanRef::Gap(cursor..text.len()));
        }

        Ok(spans)
    }

    /// Split text into byte blocks covering the whole input in order.
    pub fn split_blocks<'t>(
        &self,
        text: &'t str,
    ) -> BpeResult<Vec<&'t [u8]>> {
        let bytes = text.as_bytes();
        Ok(self
            .split_spans(text)?
            .into_iter()
            .map(|span| &bytes[Range::<usize>::from(span)])
            .collect())
    }
}
