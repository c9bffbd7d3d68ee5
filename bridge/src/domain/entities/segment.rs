use serde::Serialize;

use crate::domain::records::SegmentRecord;

/// Read-only view over a list segment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Segment {
    id: String,
    member_count: i64,
    name: String,
}

impl Segment {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn member_count(&self) -> i64 {
        self.member_count
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<SegmentRecord> for Segment {
    fn from(record: SegmentRecord) -> Self {
        Self {
            id: record.id,
            member_count: record.member_count,
            name: record.name,
        }
    }
}
