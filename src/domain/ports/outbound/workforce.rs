use async_trait::async_trait;

use crate::domain::{
    models::{Employee, EmployeeId},
    StoreError,
};

/// Outbound port for the user/account directory.
#[async_trait]
pub trait WorkforceDirectory: Send + Sync + 'static {
    /// Every record with the employee role, for the shift-swap search.
    ///
    /// Must be fetched fresh per analysis run; one employee's projected hours
    /// can legitimately change between checks within a sweep.
    async fn employees(&self) -> Result<Vec<Employee>, StoreError>;

    /// One employee's record; `None` means "skip, no analysis possible".
    async fn employee(&self, id: &EmployeeId) -> Result<Option<Employee>, StoreError>;

    /// A manager's contact record.
    async fn manager(&self, id: &EmployeeId) -> Result<Option<Employee>, StoreError>;

    /// All admin contact records, copied on every risk notification.
    async fn admins(&self) -> Result<Vec<Employee>, StoreError>;
}
