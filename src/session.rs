//! The state container behind the viewer
//!
//! A [`Session`] owns the record store and the view parameters. Every user
//! action goes through [`Session::dispatch`]; renderers read immutable
//! [`ViewSnapshot`]s and use the revision counter to know when to rebuild.

use crate::{
    core::config::ViewerConfig,
    data::{
        formats::{DataProcessor, IngestError},
        manual::{EntryPolicy, ManualEntry, ManualEntryError},
        record::Record,
        store::RecordStore,
    },
    view::{
        bucket::BucketThresholds,
        params::{SortDirection, SortKey, ViewParams},
        pipeline,
        presentation::ViewSnapshot,
    },
    Error, Result,
};

/// Something the user did
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A file finished reading; its name decides the format
    LoadFile { name: String, content: String },
    SubmitManual(ManualEntry),
    SetThreshold(Option<f64>),
    SetSearch(String),
    SetSortKey(SortKey),
    SetSortDirection(SortDirection),
    DismissNotice,
}

/// What a successful dispatch changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The store was replaced by an upload
    Loaded { accepted: usize, dropped: usize },
    /// One manual record was appended
    Appended,
    ViewChanged,
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Message for the user, shown until dismissed or replaced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

pub struct Session {
    store: RecordStore,
    params: ViewParams,
    thresholds: BucketThresholds,
    policy: EntryPolicy,
    revision: u64,
    notice: Option<Notice>,
}

impl Session {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            store: RecordStore::new(),
            params: ViewParams::default(),
            thresholds: config.buckets,
            policy: if config.entry.strict_manual_entry {
                EntryPolicy::Strict
            } else {
                EntryPolicy::Lenient
            },
            revision: 0,
            notice: None,
        }
    }

    pub fn with_records(config: &ViewerConfig, records: Vec<Record>) -> Self {
        let mut session = Self::new(config);
        session.store = RecordStore::from_records(records);
        session
    }

    /// Applies one action. On error the store is untouched and the error is
    /// also left as the current notice.
    pub fn dispatch(&mut self, action: Action) -> Result<Outcome> {
        log::debug!("dispatch {:?}", action_name(&action));

        let result = match action {
            Action::LoadFile { name, content } => self.load_file(&name, &content),
            Action::SubmitManual(entry) => self.submit_manual(&entry).map(|_| Outcome::Appended),
            Action::SetThreshold(min_value) => Ok(self.update_params(|p| p.min_value = min_value)),
            Action::SetSearch(search) => Ok(self.update_params(|p| p.search = search)),
            Action::SetSortKey(key) => Ok(self.update_params(|p| p.sort_key = key)),
            Action::SetSortDirection(direction) => {
                Ok(self.update_params(|p| p.direction = direction))
            }
            Action::DismissNotice => {
                let had_notice = self.notice.take().is_some();
                Ok(if had_notice {
                    self.bump();
                    Outcome::ViewChanged
                } else {
                    Outcome::Unchanged
                })
            }
        };

        if let Err(e) = &result {
            self.report_error(e.to_string());
        }
        result
    }

    /// Replaces the store with the records of an uploaded file
    pub fn load_file(&mut self, name: &str, content: &str) -> Result<Outcome> {
        let batch = DataProcessor::parse_file(name, content).map_err(|e| {
            log::warn!("rejected upload {}: {}", name, detail(&e));
            Error::from(e)
        })?;

        let accepted = batch.records.len();
        let dropped = batch.dropped;
        let previous = self.store.replace(batch.records);
        log::info!(
            "loaded {} from {}: replaced {} records with {}",
            batch.format,
            name,
            previous.len(),
            accepted
        );

        self.notice = Some(Notice::info(if dropped > 0 {
            format!("Loaded {} records from {} ({} invalid rows skipped)", accepted, name, dropped)
        } else {
            format!("Loaded {} records from {}", accepted, name)
        }));
        self.bump();
        Ok(Outcome::Loaded { accepted, dropped })
    }

    /// Appends one manually entered record to whatever set is current
    pub fn submit_manual(&mut self, entry: &ManualEntry) -> Result<&Record> {
        if !entry.is_complete() {
            return Err(ManualEntryError::Incomplete.into());
        }
        let record = entry.to_record(self.policy)?;
        if !record.is_valid() {
            log::debug!("storing manual entry {:?} with non-numeric fields", record.city);
        }

        self.bump();
        Ok(self.store.append(record))
    }

    /// Surfaces a failure that happened outside the session, such as a file read
    pub fn report_error(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice::error(message));
        self.bump();
    }

    fn update_params(&mut self, change: impl FnOnce(&mut ViewParams)) -> Outcome {
        let before = self.params.clone();
        change(&mut self.params);
        if self.params == before {
            Outcome::Unchanged
        } else {
            self.bump();
            Outcome::ViewChanged
        }
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn records(&self) -> &[Record] {
        self.store.records()
    }

    pub fn params(&self) -> &ViewParams {
        &self.params
    }

    pub fn thresholds(&self) -> &BucketThresholds {
        &self.thresholds
    }

    pub fn policy(&self) -> EntryPolicy {
        self.policy
    }

    /// Changes on every successful state change
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Filtered, searched and sorted records
    pub fn visible(&self) -> Vec<&Record> {
        pipeline::apply(&self.store, &self.params)
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot::build(&self.visible(), &self.thresholds, self.revision, self.store.len())
    }
}

fn action_name(action: &Action) -> &'static str {
    match action {
        Action::LoadFile { .. } => "load_file",
        Action::SubmitManual(_) => "submit_manual",
        Action::SetThreshold(_) => "set_threshold",
        Action::SetSearch(_) => "set_search",
        Action::SetSortKey(_) => "set_sort_key",
        Action::SetSortDirection(_) => "set_sort_direction",
        Action::DismissNotice => "dismiss_notice",
    }
}

fn detail(error: &IngestError) -> String {
    match error {
        IngestError::UnsupportedFormat { extension } => format!("extension {:?}", extension),
        IngestError::InvalidJson { detail } => detail.clone(),
        IngestError::Csv(e) => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::bucket::Bucket;

    fn three_cities() -> Session {
        Session::with_records(
            &ViewerConfig::default(),
            vec![
                Record::new("Lahore", 31.5, 74.3, 12_000_000.0),
                Record::new("Karachi", 24.8, 67.0, 16_000_000.0),
                Record::new("Multan", 30.2, 71.5, 2_000_000.0),
            ],
        )
    }

    #[test]
    fn test_upload_replaces_store() {
        let mut session = three_cities();
        let outcome = session
            .dispatch(Action::LoadFile {
                name: "new.json".into(),
                content: r#"[{"city":"Karachi","lat":24.8,"lng":67.0,"value":6000000}]"#.into(),
            })
            .unwrap();

        assert_eq!(outcome, Outcome::Loaded { accepted: 1, dropped: 0 });
        assert_eq!(session.records().len(), 1);
        assert_eq!(session.snapshot().markers[0].bucket, Bucket::Medium);
        assert_eq!(session.notice().unwrap().level, NoticeLevel::Info);
    }

    #[test]
    fn test_failed_upload_keeps_store_and_notifies() {
        let mut session = three_cities();
        let before = session.records().to_vec();
        let revision = session.revision();

        let err = session
            .dispatch(Action::LoadFile {
                name: "broken.json".into(),
                content: "{not valid}".into(),
            })
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid JSON format");
        assert_eq!(session.records(), before.as_slice());
        let notice = session.notice().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "Invalid JSON format");
        assert!(session.revision() > revision);

        session.dispatch(Action::DismissNotice).unwrap();
        assert!(session.notice().is_none());
    }

    #[test]
    fn test_unsupported_extension() {
        let mut session = three_cities();
        let err = session.load_file("cities.xml", "<cities/>").unwrap_err();
        assert!(matches!(err, Error::Ingest(IngestError::UnsupportedFormat { .. })));
        assert_eq!(session.records().len(), 3);
    }

    #[test]
    fn test_manual_entry_appends() {
        let mut session = three_cities();
        let before = session.records().to_vec();

        let entry = ManualEntry::new("Quetta", "30.2", "67.0", "1000000");
        assert_eq!(session.dispatch(Action::SubmitManual(entry)).unwrap(), Outcome::Appended);

        assert_eq!(session.records().len(), 4);
        assert_eq!(&session.records()[..3], before.as_slice());
        assert_eq!(session.records()[3], Record::new("Quetta", 30.2, 67.0, 1_000_000.0));
    }

    #[test]
    fn test_manual_entry_policies() {
        let bad = ManualEntry::new("Nowhere", "x", "67.0", "5");

        let mut lenient = three_cities();
        let record = lenient.submit_manual(&bad).unwrap();
        assert!(record.lat.is_nan());
        assert_eq!(lenient.records().len(), 4);

        let mut config = ViewerConfig::default();
        config.entry.strict_manual_entry = true;
        let mut strict = Session::new(&config);
        assert_eq!(strict.policy(), EntryPolicy::Strict);
        let err = strict.dispatch(Action::SubmitManual(bad)).unwrap_err();
        assert!(matches!(err, Error::ManualEntry(ManualEntryError::InvalidNumber { field: "lat", .. })));
        assert!(strict.records().is_empty());

        let incomplete = ManualEntry::new("Quetta", "", "67.0", "5");
        assert!(lenient.submit_manual(&incomplete).is_err());
        assert_eq!(lenient.records().len(), 4);
    }

    #[test]
    fn test_view_params_and_revision() {
        let mut session = three_cities();
        let start = session.revision();

        assert_eq!(
            session.dispatch(Action::SetSortKey(SortKey::Value)).unwrap(),
            Outcome::ViewChanged
        );
        assert_eq!(
            session.dispatch(Action::SetSortKey(SortKey::Value)).unwrap(),
            Outcome::Unchanged
        );
        session.dispatch(Action::SetSortDirection(SortDirection::Descending)).unwrap();
        session.dispatch(Action::SetThreshold(Some(1.0e6))).unwrap();
        session.dispatch(Action::SetSearch("a".into())).unwrap();
        assert_eq!(session.revision(), start + 4);

        let cities: Vec<&str> = session.visible().iter().map(|r| r.city.as_str()).collect();
        assert_eq!(cities, vec!["Karachi", "Lahore", "Multan"]);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.total, 3);
        assert_eq!(snapshot.revision, session.revision());
        assert_eq!(snapshot.rows.len(), snapshot.markers.len());
    }
}
