use std::io::Write;

use crate::comparison::domain::comparison_record::ComparisonRecord;
use crate::comparison::domain::record_sink::RecordSink;
use crate::shared::error::CompareError;

/// Writes `<index> <keyframe_pos> <ssim>` lines, one per record.
pub struct TextRecordSink<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> TextRecordSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> RecordSink for TextRecordSink<W> {
    fn write(&mut self, record: &ComparisonRecord) -> Result<(), CompareError> {
        writeln!(self.out, "{record}").map_err(CompareError::Output)
    }

    fn finish(&mut self) -> Result<(), CompareError> {
        self.out.flush().map_err(CompareError::Output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(index: usize, keyframe_pos: i64, ssim: f64) -> ComparisonRecord {
        ComparisonRecord {
            index,
            keyframe_pos,
            ssim,
        }
    }

    #[test]
    fn test_writes_one_line_per_record() {
        let mut sink = TextRecordSink::new(Vec::new());
        sink.write(&record(1, 0, 1.0)).unwrap();
        sink.write(&record(2, 0, 0.9876543)).unwrap();
        sink.write(&record(3, 5120, 0.5)).unwrap();
        sink.finish().unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(text, "1 0 1.000000\n2 0 0.987654\n3 5120 0.500000\n");
    }

    #[test]
    fn test_no_records_writes_nothing() {
        let mut sink = TextRecordSink::new(Vec::new());
        sink.finish().unwrap();
        assert!(sink.into_inner().is_empty());
    }
}
