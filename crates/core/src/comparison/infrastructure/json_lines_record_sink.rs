use std::io::Write;

use crate::comparison::domain::comparison_record::ComparisonRecord;
use crate::comparison::domain::record_sink::RecordSink;
use crate::shared::error::CompareError;

/// Writes each record as a single-line JSON object.
pub struct JsonLinesRecordSink<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> JsonLinesRecordSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> RecordSink for JsonLinesRecordSink<W> {
    fn write(&mut self, record: &ComparisonRecord) -> Result<(), CompareError> {
        serde_json::to_writer(&mut self.out, record)
            .map_err(|e| CompareError::Output(e.into()))?;
        self.out.write_all(b"\n").map_err(CompareError::Output)
    }

    fn finish(&mut self) -> Result<(), CompareError> {
        self.out.flush().map_err(CompareError::Output)
    }
}
