/// Counters describing what normalization dropped or merged
///
/// Attached to every Bom so callers can report recovered upstream problems
/// without failing the run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizationDiagnostics {
    pub malformed_records: usize,
    pub malformed_relationships: usize,
    pub dangling_relationships: usize,
    pub self_loops: usize,
    pub duplicates_merged: usize,
}

impl NormalizationDiagnostics {
    /// Total number of dropped records and edges
    pub fn dropped_total(&self) -> usize {
        self.malformed_records
            + self.malformed_relationships
            + self.dangling_relationships
            + self.self_loops
    }

    pub fn is_clean(&self) -> bool {
        self.dropped_total() == 0
    }
}
