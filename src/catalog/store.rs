use super::{AttendanceRecord, Class, fixtures};
use crate::{Error, Result};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Data access for classes and attendance history.
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    async fn list_classes(&self) -> Result<Vec<Class>>;

    async fn get_class(&self, class_id: &str) -> Result<Class>;

    /// Records ordered newest first.
    async fn list_records(&self) -> Result<Vec<AttendanceRecord>>;

    async fn record_attendance(&self, record: AttendanceRecord) -> Result<AttendanceRecord>;
}

/// Process-local store. Nothing survives a restart.
pub struct InMemoryStore {
    classes: Vec<Class>,
    records: RwLock<Vec<AttendanceRecord>>,
}

impl InMemoryStore {
    pub fn new(classes: Vec<Class>, records: Vec<AttendanceRecord>) -> Self {
        Self {
            classes,
            records: RwLock::new(records),
        }
    }

    /// Store pre-populated with the demo school.
    pub fn seeded() -> Self {
        let classes = fixtures::classes();
        let records = fixtures::attendance_records(&classes);
        info!(
            "Seeded in-memory store with {} classes and {} attendance records",
            classes.len(),
            records.len()
        );
        Self::new(classes, records)
    }
}

#[async_trait]
impl AttendanceStore for InMemoryStore {
    async fn list_classes(&self) -> Result<Vec<Class>> {
        Ok(self.classes.clone())
    }

    async fn get_class(&self, class_id: &str) -> Result<Class> {
        self.classes
            .iter()
            .find(|c| c.id == class_id)
            .cloned()
            .ok_or_else(|| Error::ClassNotFound {
                class_id: class_id.to_string(),
            })
    }

    async fn list_records(&self) -> Result<Vec<AttendanceRecord>> {
        let mut records = self.records.read().await.clone();
        // Stable: records sharing a date keep insertion order.
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }

    async fn record_attendance(&self, record: AttendanceRecord) -> Result<AttendanceRecord> {
        if !self.classes.iter().any(|c| c.id == record.class_id) {
            return Err(Error::ClassNotFound {
                class_id: record.class_id,
            });
        }

        debug!(
            "Recording attendance for {} on {}: {} present, {} absent",
            record.class_id, record.date, record.present, record.absent
        );

        // Newest first among same-day records.
        self.records.write().await.insert(0, record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_seeded_store_lists_classes() {
        let store = InMemoryStore::seeded();

        let classes = store.list_classes().await.unwrap();
        assert_eq!(classes.len(), 4);

        let physics = store.get_class("phy201").await.unwrap();
        assert_eq!(physics.name, "Physics I");
        assert_eq!(physics.student_count(), 10);
    }

    #[tokio::test]
    async fn test_unknown_class() {
        let store = InMemoryStore::seeded();

        let err = store.get_class("bio404").await.unwrap_err();
        assert!(matches!(err, Error::ClassNotFound { class_id } if class_id == "bio404"));
    }

    #[tokio::test]
    async fn test_records_newest_first() {
        let store = InMemoryStore::seeded();

        let ids: Vec<String> = store
            .list_records()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["r1", "r2", "r3", "r4", "r5"]);
    }

    #[tokio::test]
    async fn test_record_attendance_appears_first() {
        let store = InMemoryStore::seeded();
        let class = store.get_class("eng301").await.unwrap();

        let record = AttendanceRecord::new(&class, date(2024, 5, 21), 7, 1, "Ms. Clarke");
        let saved = store.record_attendance(record.clone()).await.unwrap();
        assert_eq!(saved, record);

        let records = store.list_records().await.unwrap();
        assert_eq!(records.len(), 6);
        assert_eq!(records[0].id, record.id);
        assert_eq!(records[0].confirmed_by, "Ms. Clarke");
    }

    #[tokio::test]
    async fn test_same_day_records_newest_first() {
        let store = InMemoryStore::seeded();
        let class = store.get_class("math101").await.unwrap();

        let first = AttendanceRecord::new(&class, date(2024, 5, 20), 10, 2, "Mr. Davison");
        let second = AttendanceRecord::new(&class, date(2024, 5, 20), 12, 0, "Mr. Davison");
        store.record_attendance(first.clone()).await.unwrap();
        store.record_attendance(second.clone()).await.unwrap();

        let records = store.list_records().await.unwrap();
        assert_eq!(records[0].id, second.id);
        assert_eq!(records[1].id, first.id);
        assert_eq!(records[2].id, "r1");
    }

    #[tokio::test]
    async fn test_record_for_unknown_class_rejected() {
        let store = InMemoryStore::new(Vec::new(), Vec::new());
        let ghost = fixtures::classes().remove(0);

        let record = AttendanceRecord::new(&ghost, date(2024, 5, 21), 1, 0, "Mr. Davison");
        assert!(matches!(
            store.record_attendance(record).await,
            Err(Error::ClassNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_concurrent_recording() {
        let store = Arc::new(InMemoryStore::seeded());
        let class = store.get_class("his102").await.unwrap();

        let mut handles = vec![];
        for day in 1..=10 {
            let store = Arc::clone(&store);
            let record = AttendanceRecord::new(&class, date(2024, 6, day), 11, 0, "Mr. Davison");
            handles.push(tokio::spawn(async move {
                store.record_attendance(record).await
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let records = store.list_records().await.unwrap();
        assert_eq!(records.len(), 15);
        assert_eq!(records[0].date, date(2024, 6, 10));
    }
}
