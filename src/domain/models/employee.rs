use serde::{Deserialize, Serialize};

use crate::domain::Email;

use super::EmployeeId;

/// A workforce directory record.
///
/// Contact fields are optional; the notification dispatcher simply skips
/// channels a record cannot receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub full_name: String,
    pub email: Option<Email>,
    pub phone: Option<String>,
    pub manager_id: Option<EmployeeId>,
}

impl Employee {
    pub fn new(id: impl Into<EmployeeId>, full_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            email: None,
            phone: None,
            manager_id: None,
        }
    }

    pub fn with_email(mut self, email: Email) -> Self {
        self.email = Some(email);
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_manager(mut self, manager_id: impl Into<EmployeeId>) -> Self {
        self.manager_id = Some(manager_id.into());
        self
    }
}
