//! PostgreSQL client store

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::{ClientStore, StoreError};
use crate::domain::{Client, ClientProfile, CreditRecord, CreditStatus, NewCredit};

type ClientRow = (
    i64,
    i64,
    Option<String>,
    String,
    String,
    String,
    String,
    String,
);

type CreditRow = (i64, i64, Decimal, String, i64, i16, Option<i64>, i64);

fn client_from_row(row: ClientRow) -> Client {
    let (id, orzu_id, pan, name, phone_number, set_date, passport_id, passport_issue_date) = row;
    Client {
        id,
        orzu_id,
        pan,
        name,
        phone_number,
        set_date,
        passport_id,
        passport_issue_date,
    }
}

fn credit_from_row(row: CreditRow) -> Result<CreditRecord, StoreError> {
    let (id, terminal_id, sum, recipient, condition_id, status_id, transaction_id, client_id) = row;
    let status = CreditStatus::from_code(status_id).ok_or_else(|| {
        StoreError::InvalidData(format!("credit {} has unknown status_id {}", id, status_id))
    })?;

    Ok(CreditRecord {
        id,
        terminal_id,
        sum,
        recipient,
        condition_id,
        status,
        transaction_id,
        client_id,
    })
}

/// Client store backed by the `orzu_clients` and `orzu_credits` tables
#[derive(Debug, Clone)]
pub struct PgClientStore {
    pool: PgPool,
}

impl PgClientStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClientStore for PgClientStore {
    async fn insert_client(&self, profile: &ClientProfile) -> Result<Client, StoreError> {
        // The unique index on orzu_id arbitrates concurrent first tranches
        let id: Option<i64> = sqlx::query_scalar(
            r#"
            INSERT INTO orzu_clients
                (orzu_id, name, phone_number, set_date, passport_id, passport_issue_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (orzu_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(profile.orzu_id)
        .bind(&profile.client_name)
        .bind(&profile.phone_number)
        .bind(&profile.set_date)
        .bind(&profile.passport_id)
        .bind(&profile.passport_issue_date)
        .fetch_optional(&self.pool)
        .await?;

        let id = id.ok_or(StoreError::DuplicateClient(profile.orzu_id))?;
        Ok(Client::from_profile(id, profile))
    }

    async fn find_client_by_orzu_id(&self, orzu_id: i64) -> Result<Option<Client>, StoreError> {
        let row: Option<ClientRow> = sqlx::query_as(
            r#"
            SELECT id, orzu_id, pan, name, phone_number, set_date, passport_id, passport_issue_date
            FROM orzu_clients
            WHERE orzu_id = $1
            "#,
        )
        .bind(orzu_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(client_from_row))
    }

    async fn insert_credit(&self, credit: &NewCredit) -> Result<CreditRecord, StoreError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO orzu_credits
                (terminal_id, sum, recipient, condition_id, status_id, client_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(credit.terminal_id)
        .bind(credit.sum.value())
        .bind(&credit.recipient)
        .bind(credit.condition_id)
        .bind(credit.status.code())
        .bind(credit.client_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(CreditRecord::from_new(id, credit))
    }

    async fn update_credit_transaction_id(
        &self,
        credit_id: i64,
        transaction_id: i64,
    ) -> Result<(), StoreError> {
        let rows = sqlx::query(
            r#"
            UPDATE orzu_credits
            SET transh_id = $2, updated_at = NOW()
            WHERE id = $1 AND transh_id IS NULL
            "#,
        )
        .bind(credit_id)
        .bind(transaction_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            return match self.find_credit(credit_id).await? {
                Some(_) => Err(StoreError::AlreadyLinked(credit_id)),
                None => Err(StoreError::CreditNotFound(credit_id)),
            };
        }

        Ok(())
    }

    async fn find_credit(&self, credit_id: i64) -> Result<Option<CreditRecord>, StoreError> {
        let row: Option<CreditRow> = sqlx::query_as(
            r#"
            SELECT id, terminal_id, sum, recipient, condition_id, status_id, transh_id, client_id
            FROM orzu_credits
            WHERE id = $1
            "#,
        )
        .bind(credit_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(credit_from_row).transpose()
    }
}
