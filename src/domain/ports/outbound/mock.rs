//! In-memory port implementations for tests and embedding hosts.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use time::{Date, OffsetDateTime};

use crate::domain::{
    models::{BreakEntry, Employee, EmployeeId, RiskSnapshot, Shift, TimeEntry, TimeEntryId},
    Email, GatewayError, StoreError,
};

use super::{NotificationGateway, NotificationMarkerStore, TimeLedgerStore, WorkforceDirectory};

/// Mock time-tracking store backed by plain vectors.
///
/// `failing_for` makes every query for one employee fail, to exercise the
/// sweep's per-employee error isolation.
#[derive(Clone, Default)]
pub struct InMemoryTimeLedger {
    entries: Arc<RwLock<Vec<TimeEntry>>>,
    breaks: Arc<RwLock<Vec<BreakEntry>>>,
    shifts: Arc<RwLock<Vec<Shift>>>,
    failing_employee: Arc<RwLock<Option<EmployeeId>>>,
}

impl InMemoryTimeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(self, entries: Vec<TimeEntry>) -> Self {
        self.entries.write().unwrap().extend(entries);
        self
    }

    pub fn with_breaks(self, breaks: Vec<BreakEntry>) -> Self {
        self.breaks.write().unwrap().extend(breaks);
        self
    }

    pub fn with_shifts(self, shifts: Vec<Shift>) -> Self {
        self.shifts.write().unwrap().extend(shifts);
        self
    }

    pub fn failing_for(self, employee: EmployeeId) -> Self {
        self.failing_employee.write().unwrap().replace(employee);
        self
    }

    fn check_available(&self, employee: &EmployeeId) -> Result<(), StoreError> {
        match self.failing_employee.read().unwrap().as_ref() {
            Some(failing) if failing == employee => Err(StoreError::Unavailable(format!(
                "ledger queries for {employee} are configured to fail"
            ))),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl TimeLedgerStore for InMemoryTimeLedger {
    async fn entries_in_range(
        &self,
        employee: &EmployeeId,
        range: (OffsetDateTime, OffsetDateTime),
    ) -> Result<Vec<TimeEntry>, StoreError> {
        self.check_available(employee)?;
        Ok(self
            .entries
            .read()
            .unwrap()
            .iter()
            .filter(|e| {
                e.employee_id == *employee && e.clock_in >= range.0 && e.clock_in <= range.1
            })
            .cloned()
            .collect())
    }

    async fn breaks_for_entry(&self, entry: &TimeEntryId) -> Result<Vec<BreakEntry>, StoreError> {
        Ok(self
            .breaks
            .read()
            .unwrap()
            .iter()
            .filter(|b| b.time_entry_id == *entry)
            .cloned()
            .collect())
    }

    async fn shifts_in_range(
        &self,
        employee: &EmployeeId,
        range: (OffsetDateTime, OffsetDateTime),
    ) -> Result<Vec<Shift>, StoreError> {
        self.check_available(employee)?;
        Ok(self
            .shifts
            .read()
            .unwrap()
            .iter()
            .filter(|s| {
                s.employee_id == *employee
                    && !s.day_off
                    && s.start >= range.0
                    && s.start <= range.1
            })
            .cloned()
            .collect())
    }

    async fn open_entry(&self, employee: &EmployeeId) -> Result<Option<TimeEntry>, StoreError> {
        self.check_available(employee)?;
        Ok(self
            .entries
            .read()
            .unwrap()
            .iter()
            .find(|e| e.employee_id == *employee && e.is_open())
            .cloned())
    }
}

/// Mock workforce directory over fixed employee and admin lists.
#[derive(Clone, Default)]
pub struct InMemoryDirectory {
    employees: Arc<RwLock<Vec<Employee>>>,
    admins: Arc<RwLock<Vec<Employee>>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_employees(self, employees: Vec<Employee>) -> Self {
        self.employees.write().unwrap().extend(employees);
        self
    }

    pub fn with_admins(self, admins: Vec<Employee>) -> Self {
        self.admins.write().unwrap().extend(admins);
        self
    }
}

#[async_trait]
impl WorkforceDirectory for InMemoryDirectory {
    async fn employees(&self) -> Result<Vec<Employee>, StoreError> {
        Ok(self.employees.read().unwrap().clone())
    }

    async fn employee(&self, id: &EmployeeId) -> Result<Option<Employee>, StoreError> {
        Ok(self
            .employees
            .read()
            .unwrap()
            .iter()
            .find(|e| e.id == *id)
            .cloned())
    }

    async fn manager(&self, id: &EmployeeId) -> Result<Option<Employee>, StoreError> {
        // Managers are not part of the employee-role list.
        let admins = self.admins.read().unwrap();
        let employees = self.employees.read().unwrap();
        Ok(admins
            .iter()
            .chain(employees.iter())
            .find(|e| e.id == *id)
            .cloned())
    }

    async fn admins(&self) -> Result<Vec<Employee>, StoreError> {
        Ok(self.admins.read().unwrap().clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentEmail {
    pub recipients: Vec<Email>,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentSms {
    pub recipients: Vec<String>,
    pub message: String,
}

/// Mock gateway that records every send, or fails every send when built with
/// `failing()`.
#[derive(Clone, Default)]
pub struct RecordingGateway {
    emails: Arc<RwLock<Vec<SentEmail>>>,
    sms: Arc<RwLock<Vec<SentSms>>>,
    failing: bool,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn emails(&self) -> Vec<SentEmail> {
        self.emails.read().unwrap().clone()
    }

    pub fn sms(&self) -> Vec<SentSms> {
        self.sms.read().unwrap().clone()
    }
}

#[async_trait]
impl NotificationGateway for RecordingGateway {
    async fn send_email(
        &self,
        recipients: &[Email],
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> Result<(), GatewayError> {
        if self.failing {
            return Err(GatewayError::Send("gateway configured to fail".into()));
        }
        self.emails.write().unwrap().push(SentEmail {
            recipients: recipients.to_vec(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
            text_body: text_body.to_string(),
        });
        Ok(())
    }

    async fn send_sms(&self, recipients: &[String], message: &str) -> Result<(), GatewayError> {
        if self.failing {
            return Err(GatewayError::Send("gateway configured to fail".into()));
        }
        self.sms.write().unwrap().push(SentSms {
            recipients: recipients.to_vec(),
            message: message.to_string(),
        });
        Ok(())
    }
}

/// Mock marker store keyed on employee + calendar day.
#[derive(Clone, Default)]
pub struct InMemoryMarkerStore {
    records: Arc<RwLock<HashMap<(EmployeeId, Date), RiskSnapshot>>>,
}

impl InMemoryMarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().unwrap().is_empty()
    }

    pub fn snapshot(&self, employee: &EmployeeId, date: Date) -> Option<RiskSnapshot> {
        self.records
            .read()
            .unwrap()
            .get(&(employee.clone(), date))
            .cloned()
    }
}

#[async_trait]
impl NotificationMarkerStore for InMemoryMarkerStore {
    async fn notified_on(&self, employee: &EmployeeId, date: Date) -> Result<bool, StoreError> {
        Ok(self
            .records
            .read()
            .unwrap()
            .contains_key(&(employee.clone(), date)))
    }

    async fn upsert(
        &self,
        employee: &EmployeeId,
        date: Date,
        snapshot: &RiskSnapshot,
    ) -> Result<(), StoreError> {
        self.records
            .write()
            .unwrap()
            .insert((employee.clone(), date), snapshot.clone());
        Ok(())
    }
}
