//! Customers service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::customers::{
        data::NewCustomer,
        errors::CustomersServiceError,
        records::{CustomerRecord, CustomerUuid},
        repository::PgCustomersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCustomersService {
    db: Db,
    repository: PgCustomersRepository,
}

impl PgCustomersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCustomersRepository::new(),
        }
    }
}

#[async_trait]
impl CustomersService for PgCustomersService {
    async fn create_customer(
        &self,
        customer: NewCustomer,
    ) -> Result<CustomerRecord, CustomersServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_customer(&mut tx, customer).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_customer(
        &self,
        customer: CustomerUuid,
    ) -> Result<CustomerRecord, CustomersServiceError> {
        let mut tx = self.db.begin().await?;

        let customer = self.repository.get_customer(&mut tx, customer).await?;

        tx.commit().await?;

        Ok(customer)
    }
}

#[automock]
#[async_trait]
pub trait CustomersService: Send + Sync {
    /// Creates a new customer record.
    async fn create_customer(
        &self,
        customer: NewCustomer,
    ) -> Result<CustomerRecord, CustomersServiceError>;

    /// Retrieve a single customer.
    async fn get_customer(
        &self,
        customer: CustomerUuid,
    ) -> Result<CustomerRecord, CustomersServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    fn new_customer(uuid: CustomerUuid, email: &str) -> NewCustomer {
        NewCustomer {
            uuid,
            full_name: "Priya Raman".to_string(),
            email: email.to_string(),
            phone: Some("+919876543210".to_string()),
            address: None,
        }
    }

    #[tokio::test]
    async fn create_customer_returns_persisted_record() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = CustomerUuid::new();

        let customer = ctx
            .customers
            .create_customer(new_customer(uuid, "priya@example.com"))
            .await?;

        assert_eq!(customer.uuid, uuid);
        assert_eq!(customer.full_name, "Priya Raman");
        assert_eq!(customer.email, "priya@example.com");

        Ok(())
    }

    #[tokio::test]
    async fn get_customer_returns_created_customer() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = CustomerUuid::new();

        ctx.customers
            .create_customer(new_customer(uuid, "priya@example.com"))
            .await?;

        let customer = ctx.customers.get_customer(uuid).await?;

        assert_eq!(customer.uuid, uuid);

        Ok(())
    }

    #[tokio::test]
    async fn get_customer_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.customers.get_customer(CustomerUuid::new()).await;

        assert!(
            matches!(result, Err(CustomersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn duplicate_email_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.customers
            .create_customer(new_customer(CustomerUuid::new(), "same@example.com"))
            .await?;

        let result = ctx
            .customers
            .create_customer(new_customer(CustomerUuid::new(), "same@example.com"))
            .await;

        assert!(
            matches!(result, Err(CustomersServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }
}
