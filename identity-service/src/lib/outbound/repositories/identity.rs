use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::identity::errors::AuthError;
use crate::identity::models::EmailAddress;
use crate::identity::models::Identity;
use crate::identity::models::IdentityId;
use crate::identity::ports::IdentityRepository;

#[derive(Debug, FromRow)]
struct IdentityRow {
    id: Uuid,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: Option<String>,
    confirmed: bool,
    refresh_token: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<IdentityRow> for Identity {
    type Error = AuthError;

    fn try_from(row: IdentityRow) -> Result<Self, Self::Error> {
        Ok(Identity {
            id: IdentityId(row.id),
            email: EmailAddress::new(row.email)?,
            password_hash: row.password_hash,
            first_name: row.first_name,
            last_name: row.last_name,
            confirmed: row.confirmed,
            refresh_token: row.refresh_token,
            created_at: row.created_at,
        })
    }
}

fn store_error(e: sqlx::Error) -> AuthError {
    AuthError::StoreUnavailable(e.to_string())
}

pub struct PostgresIdentityRepository {
    pool: PgPool,
}

impl PostgresIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityRepository for PostgresIdentityRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, AuthError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT id, email, password_hash, first_name, last_name, confirmed, refresh_token, created_at
            FROM identities
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        row.map(Identity::try_from).transpose()
    }

    async fn create(&self, identity: Identity) -> Result<Identity, AuthError> {
        sqlx::query(
            r#"
            INSERT INTO identities (id, email, password_hash, first_name, last_name, confirmed, refresh_token, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(identity.id.0)
        .bind(identity.email.as_str())
        .bind(&identity.password_hash)
        .bind(&identity.first_name)
        .bind(&identity.last_name)
        .bind(identity.confirmed)
        .bind(&identity.refresh_token)
        .bind(identity.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AuthError::AlreadyExists(identity.email.to_string());
                }
            }
            store_error(e)
        })?;

        Ok(identity)
    }

    async fn set_refresh_token(&self, email: &str, token: &str) -> Result<(), AuthError> {
        let result = sqlx::query(
            r#"
            UPDATE identities
            SET refresh_token = $2
            WHERE email = $1
            "#,
        )
        .bind(email)
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(AuthError::NotFound(email.to_string()));
        }

        Ok(())
    }

    async fn set_confirmed(&self, email: &str) -> Result<(), AuthError> {
        let result = sqlx::query(
            r#"
            UPDATE identities
            SET confirmed = TRUE
            WHERE email = $1
            "#,
        )
        .bind(email)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(AuthError::NotFound(email.to_string()));
        }

        Ok(())
    }
}
