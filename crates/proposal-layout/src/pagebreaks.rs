//! Page boundary bookkeeping
//!
//! Two product blocks fit on one physical page. The tracker records the
//! terminal row of every even-numbered block, then folds the footer into the
//! last page (even count) or gives it a page of its own (odd count).

use crate::types::*;
use std::fmt;
use std::str::FromStr;

/// Row every marker list starts from
pub const FIRST_MARKER: usize = 1;

/// Blocks placed on one physical page
pub const BLOCKS_PER_PAGE: usize = 2;

/// Ordered page boundary rows, strictly increasing, starting at [`FIRST_MARKER`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageBreakMarkers(Vec<usize>);

impl PageBreakMarkers {
    pub fn new(markers: Vec<usize>) -> Result<Self> {
        if markers.len() < 2 {
            return Err(LayoutError::InvalidMarkers(format!(
                "need at least two markers, got {}",
                markers.len()
            )));
        }
        if markers[0] != FIRST_MARKER {
            return Err(LayoutError::InvalidMarkers(format!(
                "first marker must be {}, got {}",
                FIRST_MARKER, markers[0]
            )));
        }
        if let Some(pair) = markers.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(LayoutError::InvalidMarkers(format!(
                "markers must increase, got {} then {}",
                pair[0], pair[1]
            )));
        }
        Ok(Self(markers))
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of physical pages delimited by the markers
    pub fn page_count(&self) -> usize {
        self.0.len() - 1
    }

    /// Row ranges `(first, last)` of every page, in page order
    pub fn page_ranges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.windows(2).map(|pair| (pair[0] + 1, pair[1]))
    }
}

impl fmt::Display for PageBreakMarkers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.0.iter().map(usize::to_string).collect();
        f.write_str(&joined.join(","))
    }
}

impl FromStr for PageBreakMarkers {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        let markers = s
            .split(',')
            .map(|part| {
                part.trim().parse::<usize>().map_err(|_| {
                    LayoutError::InvalidMarkers(format!("'{}' is not a row number", part.trim()))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(markers)
    }
}

/// Collects page boundaries while blocks are rendered
#[derive(Debug, Clone)]
pub struct PageBreakTracker {
    markers: Vec<usize>,
}

impl Default for PageBreakTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PageBreakTracker {
    pub fn new() -> Self {
        Self {
            markers: vec![FIRST_MARKER],
        }
    }

    /// Observe block `number` (1-based) ending at `terminal_row`
    pub fn observe_block(&mut self, number: usize, terminal_row: usize) {
        if number % BLOCKS_PER_PAGE == 0 {
            log::debug!("Page break after block {} at row {}", number, terminal_row);
            self.markers.push(terminal_row);
        }
    }

    /// Close the list once the footer is placed, ending at `final_row`
    pub fn finish(mut self, block_count: usize, final_row: usize) -> Result<PageBreakMarkers> {
        if block_count > 0 && block_count % BLOCKS_PER_PAGE == 0 {
            if let Some(last) = self.markers.last_mut() {
                *last = final_row;
            }
        } else {
            self.markers.push(final_row);
        }
        PageBreakMarkers::new(self.markers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_count_gives_footer_its_own_marker() {
        let mut tracker = PageBreakTracker::new();
        tracker.observe_block(1, 32);
        tracker.observe_block(2, 50);
        tracker.observe_block(3, 68);
        let markers = tracker.finish(3, 70).unwrap();
        assert_eq!(markers.as_slice(), &[1, 50, 70]);
    }

    #[test]
    fn even_count_folds_footer_into_last_page() {
        let mut tracker = PageBreakTracker::new();
        tracker.observe_block(1, 32);
        tracker.observe_block(2, 50);
        let markers = tracker.finish(2, 52).unwrap();
        assert_eq!(markers.as_slice(), &[1, 52]);
    }

    #[test]
    fn round_trips_through_delimited_string() {
        let markers = PageBreakMarkers::new(vec![1, 50, 70]).unwrap();
        assert_eq!(markers.to_string(), "1,50,70");
        assert_eq!("1, 50,70".parse::<PageBreakMarkers>().unwrap(), markers);
    }

    #[test]
    fn rejects_malformed_lists() {
        assert!("1".parse::<PageBreakMarkers>().is_err());
        assert!("2,10".parse::<PageBreakMarkers>().is_err());
        assert!("1,10,10".parse::<PageBreakMarkers>().is_err());
        assert!("1,x".parse::<PageBreakMarkers>().is_err());
        assert!("".parse::<PageBreakMarkers>().is_err());
    }

    #[test]
    fn page_ranges_are_contiguous() {
        let markers = PageBreakMarkers::new(vec![1, 50, 70]).unwrap();
        let ranges: Vec<_> = markers.page_ranges().collect();
        assert_eq!(ranges, vec![(2, 50), (51, 70)]);
        assert_eq!(markers.page_count(), 2);
    }
}
