use crate::comparison::domain::comparison_record::ComparisonRecord;
use crate::shared::error::CompareError;

/// Receives comparison records in index order as they are produced.
pub trait RecordSink: Send {
    fn write(&mut self, record: &ComparisonRecord) -> Result<(), CompareError>;

    /// Called once after the last record. Default: no-op.
    fn finish(&mut self) -> Result<(), CompareError> {
        Ok(())
    }
}
