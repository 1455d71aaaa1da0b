use crate::domain::ProcessedReadingBatch;

/// Receives processed readings, e.g. a plotter or an uplink.
pub trait ReadingSink {
    fn notify(&mut self, reading: &ProcessedReadingBatch);
}

impl<F> ReadingSink for F
where
    F: FnMut(&ProcessedReadingBatch),
{
    fn notify(&mut self, reading: &ProcessedReadingBatch) {
        self(reading)
    }
}
