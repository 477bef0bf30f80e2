//! CSV-backed audit sink
//!
//! Writes the three record streams as CSV files in an audit directory:
//! `fetch.csv`, `visit.csv`, `urls.csv`. Each stream has its own writer
//! behind its own lock, so one slow stream does not block the others.
//! Records land in completion order, not discovery order.

use crate::audit::{AuditError, AuditSink, DiscoveryRecord, FetchRecord, VisitRecord};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// File name of the fetch stream (`URL,Status`)
pub const FETCH_LOG: &str = "fetch.csv";

/// File name of the visit stream (`URL,Size,OutLinks,ContentType`)
pub const VISIT_LOG: &str = "visit.csv";

/// File name of the discovery stream (`URL,Valid`)
pub const DISCOVERY_LOG: &str = "urls.csv";

/// Audit sink writing the three streams as CSV files
pub struct CsvAuditSink {
    fetch: Mutex<csv::Writer<File>>,
    visit: Mutex<csv::Writer<File>>,
    discovery: Mutex<csv::Writer<File>>,
}

impl CsvAuditSink {
    /// Creates the audit directory (if needed) and the three stream files,
    /// writing a header row into each
    pub fn create(audit_dir: &Path) -> Result<Self, AuditError> {
        std::fs::create_dir_all(audit_dir)?;

        let mut fetch = csv::Writer::from_writer(File::create(audit_dir.join(FETCH_LOG))?);
        fetch.write_record(["URL", "Status"])?;

        let mut visit = csv::Writer::from_writer(File::create(audit_dir.join(VISIT_LOG))?);
        visit.write_record(["URL", "Size", "OutLinks", "ContentType"])?;

        let mut discovery = csv::Writer::from_writer(File::create(audit_dir.join(DISCOVERY_LOG))?);
        discovery.write_record(["URL", "Valid"])?;

        Ok(Self {
            fetch: Mutex::new(fetch),
            visit: Mutex::new(visit),
            discovery: Mutex::new(discovery),
        })
    }

    /// Path of the fetch stream inside an audit directory
    pub fn fetch_path(audit_dir: &Path) -> PathBuf {
        audit_dir.join(FETCH_LOG)
    }

    /// Path of the visit stream inside an audit directory
    pub fn visit_path(audit_dir: &Path) -> PathBuf {
        audit_dir.join(VISIT_LOG)
    }

    /// Path of the discovery stream inside an audit directory
    pub fn discovery_path(audit_dir: &Path) -> PathBuf {
        audit_dir.join(DISCOVERY_LOG)
    }
}

impl AuditSink for CsvAuditSink {
    fn record_fetch(&self, record: &FetchRecord) -> Result<(), AuditError> {
        let mut writer = self.fetch.lock().unwrap();
        writer.write_record([record.url.as_str(), &record.outcome.marker()])?;
        Ok(())
    }

    fn record_visit(&self, record: &VisitRecord) -> Result<(), AuditError> {
        let mut writer = self.visit.lock().unwrap();
        writer.write_record([
            record.url.as_str(),
            &record.byte_size.to_string(),
            &record.out_link_count.to_string(),
            record.content_type.as_str(),
        ])?;
        Ok(())
    }

    fn record_discovery(&self, record: &DiscoveryRecord) -> Result<(), AuditError> {
        let mut writer = self.discovery.lock().unwrap();
        writer.write_record([record.url.as_str(), record.validity.marker()])?;
        Ok(())
    }

    fn flush(&self) -> Result<(), AuditError> {
        self.fetch.lock().unwrap().flush()?;
        self.visit.lock().unwrap().flush()?;
        self.discovery.lock().unwrap().flush()?;
        Ok(())
    }
}
