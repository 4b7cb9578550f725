//! Schema transformation seam and debug snapshots

use std::io;
use std::path::Path;

use crate::error::TransformError;

/// File name of the pre-transform snapshot
pub const SNAPSHOT_IN: &str = "record_in.xml";
/// File name of the post-transform snapshot
pub const SNAPSHOT_OUT: &str = "record_out.xml";

/// The host's schema transformation engine, keyed to a configured transform
/// at construction. Converts the internal field-set document into the
/// registry's wire schema. Failure aborts the run before any network call.
pub trait SchemaTransformer {
    fn transform(&self, document: &str) -> Result<String, TransformError>;
}

/// Persist a diagnostics snapshot, overwriting last run's copy. Never read
/// back.
pub fn write_snapshot(dir: &Path, name: &str, document: &str) -> io::Result<()> {
    std::fs::write(dir.join(name), document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_overwrites_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        write_snapshot(dir.path(), SNAPSHOT_IN, "<record>first</record>").unwrap();
        write_snapshot(dir.path(), SNAPSHOT_IN, "<record>second</record>").unwrap();

        let content = std::fs::read_to_string(dir.path().join(SNAPSHOT_IN)).unwrap();
        assert_eq!(content, "<record>second</record>");
    }
}
