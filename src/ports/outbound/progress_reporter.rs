/// ProgressReporter port for reporting pipeline progress
///
/// This port abstracts user-facing progress output (e.g., to stderr) so the
/// encoded document on stdout or disk is never interleaved with status text.
/// Implementations must not print credential values; callers never pass any.
pub trait ProgressReporter {
    /// Reports a progress message
    fn report(&self, message: &str);

    /// Reports progress over a known number of units (e.g. scopes fetched)
    ///
    /// # Arguments
    /// * `current` - Units completed so far
    /// * `total` - Total expected units
    /// * `message` - Optional message to include
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    /// Reports a recoverable problem (dropped records, unknown config keys)
    fn report_warning(&self, message: &str);

    /// Reports completion of an operation
    fn report_completion(&self, message: &str);
}
