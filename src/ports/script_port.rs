//! Chart script generation port trait.

use std::fs;
use std::path::Path;

use crate::domain::classify::OutcomeBuckets;
use crate::domain::error::TradeplotError;

pub trait ScriptPort {
    /// Render the complete script for one instrument.
    fn render(&self, instrument: &str, buckets: &OutcomeBuckets) -> Result<String, TradeplotError>;

    /// Default implementation: render, then write the text to `output_path`,
    /// creating parent directories as needed.
    fn write(
        &self,
        instrument: &str,
        buckets: &OutcomeBuckets,
        output_path: &Path,
    ) -> Result<(), TradeplotError> {
        let script = self.render(instrument, buckets)?;
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(output_path, script)?;
        Ok(())
    }
}
