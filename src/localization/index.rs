//! Line coverage index
//!
//! Inverts a test → lines coverage matrix into line → covering tests.
//! Lines that no test executed never appear in the index.

use std::collections::{btree_map, BTreeMap, BTreeSet};

use super::types::{CoverageMatrix, LineId, TestId};

/// Line → tests that executed it.
///
/// Only constructible from a [`CoverageMatrix`], so it always equals the
/// inverse of the matrix it was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineCoverageIndex {
    lines: BTreeMap<LineId, BTreeSet<TestId>>,
}

impl LineCoverageIndex {
    /// Tests covering `line`, or `None` if no test executed it.
    pub fn covering_tests(&self, line: &str) -> Option<&BTreeSet<TestId>> {
        self.lines.get(line)
    }

    /// Covered lines in ascending order.
    pub fn lines(&self) -> impl Iterator<Item = &LineId> {
        self.lines.keys()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, LineId, BTreeSet<TestId>> {
        self.lines.iter()
    }

    /// Number of covered lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl<'a> IntoIterator for &'a LineCoverageIndex {
    type Item = (&'a LineId, &'a BTreeSet<TestId>);
    type IntoIter = btree_map::Iter<'a, LineId, BTreeSet<TestId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

/// Build the line → covering-tests index for `matrix`.
pub fn invert(matrix: &CoverageMatrix) -> LineCoverageIndex {
    let mut lines: BTreeMap<LineId, BTreeSet<TestId>> = BTreeMap::new();

    for (test, covered) in matrix {
        for line in covered {
            lines
                .entry(line.clone())
                .or_default()
                .insert(test.clone());
        }
    }

    LineCoverageIndex { lines }
}
