//! Query-plan inspection results.
//!
//! An explain report summarizes how the engine executed (or would execute) a
//! find: the winning plan's stage chain and the execution counters. The plan
//! itself is chosen by the external engine; this program only reads it back.

use std::fmt;

/// Execution statistics for a single explained find.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplainReport {
    /// Documents returned by the query.
    pub returned: u64,
    /// Documents the engine examined while executing.
    pub docs_examined: u64,
    /// Index entries the engine examined while executing.
    pub keys_examined: u64,
    /// Server-reported execution time in milliseconds.
    pub execution_time_ms: u64,
    /// Stage names of the winning plan, root first.
    pub stages: Vec<String>,
    /// Name of the index the winning plan used, if any.
    pub index_used: Option<String>,
}

impl ExplainReport {
    /// True when the winning plan scanned the whole collection.
    pub fn collection_scan(&self) -> bool {
        self.stages
            .iter()
            .any(|stage| stage == "COLLSCAN")
    }
}

impl fmt::Display for ExplainReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "returned {}, examined {} document(s) and {} key(s) in {} ms; plan: {}",
            self.returned,
            self.docs_examined,
            self.keys_examined,
            self.execution_time_ms,
            self.stages.join(" -> "),
        )?;
        if let Some(index) = &self.index_used {
            write!(f, " (index {index})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ExplainReport;

    #[test]
    fn detects_collection_scan_anywhere_in_plan() {
        let report = ExplainReport {
            stages: vec!["SORT".into(), "COLLSCAN".into()],
            ..ExplainReport::default()
        };
        assert!(report.collection_scan());

        let indexed = ExplainReport {
            stages: vec!["FETCH".into(), "IXSCAN".into()],
            index_used: Some("title_1".into()),
            ..ExplainReport::default()
        };
        assert!(!indexed.collection_scan());
    }

    #[test]
    fn display_mentions_index_when_used() {
        let report = ExplainReport {
            returned: 1,
            docs_examined: 1,
            keys_examined: 1,
            execution_time_ms: 0,
            stages: vec!["FETCH".into(), "IXSCAN".into()],
            index_used: Some("title_1".into()),
        };
        let line = report.to_string();
        assert!(line.contains("FETCH -> IXSCAN"));
        assert!(line.contains("index title_1"));
    }
}
