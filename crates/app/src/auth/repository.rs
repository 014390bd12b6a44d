//! Auth repository.

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::auth::{
    AccessTokenVersion,
    models::{AccessTokenMetadata, ActiveAccessToken, NewAccessToken},
};

const CREATE_ACCESS_TOKEN_SQL: &str = include_str!("sql/create_access_token.sql");
const FIND_ACTIVE_ACCESS_TOKEN_SQL: &str = include_str!("sql/find_active_access_token.sql");
const TOUCH_ACCESS_TOKEN_LAST_USED_SQL: &str =
    include_str!("sql/touch_access_token_last_used.sql");

#[derive(Debug, Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn create_access_token(
        &self,
        token: &NewAccessToken,
    ) -> Result<AccessTokenMetadata, sqlx::Error> {
        query_as::<Postgres, AccessTokenMetadata>(CREATE_ACCESS_TOKEN_SQL)
            .bind(token.uuid)
            .bind(token.user_uuid.into_uuid())
            .bind(token.version.as_i16())
            .bind(&token.token_hash)
            .bind(SqlxTimestamp::from(token.expires_at))
            .fetch_one(&self.pool)
            .await
    }

    pub(crate) async fn find_active_access_token(
        &self,
        token_uuid: Uuid,
        version: AccessTokenVersion,
    ) -> Result<Option<ActiveAccessToken>, sqlx::Error> {
        query_as::<Postgres, ActiveAccessToken>(FIND_ACTIVE_ACCESS_TOKEN_SQL)
            .bind(token_uuid)
            .bind(version.as_i16())
            .fetch_optional(&self.pool)
            .await
    }

    pub(crate) async fn touch_access_token_last_used(
        &self,
        token_uuid: Uuid,
    ) -> Result<u64, sqlx::Error> {
        Ok(query(TOUCH_ACCESS_TOKEN_LAST_USED_SQL)
            .bind(token_uuid)
            .execute(&self.pool)
            .await?
            .rows_affected())
    }
}

fn try_get_version(row: &PgRow) -> sqlx::Result<AccessTokenVersion> {
    AccessTokenVersion::try_from(row.try_get::<i16, _>("version")?).map_err(|source| {
        sqlx::Error::ColumnDecode {
            index: "version".to_string(),
            source: Box::new(source),
        }
    })
}

impl<'r> FromRow<'r, PgRow> for ActiveAccessToken {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let role = row
            .try_get::<String, _>("role")?
            .parse()
            .map_err(|source| sqlx::Error::ColumnDecode {
                index: "role".to_string(),
                source: Box::new(source),
            })?;

        Ok(Self {
            user_uuid: row.try_get::<Uuid, _>("user_uuid")?.into(),
            role,
            version: try_get_version(row)?,
            token_hash: row.try_get("token_hash")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for AccessTokenMetadata {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            user_uuid: row.try_get::<Uuid, _>("user_uuid")?.into(),
            version: try_get_version(row)?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            expires_at: row.try_get::<SqlxTimestamp, _>("expires_at")?.to_jiff(),
            last_used_at: row
                .try_get::<Option<SqlxTimestamp>, _>("last_used_at")?
                .map(SqlxTimestamp::to_jiff),
            revoked_at: row
                .try_get::<Option<SqlxTimestamp>, _>("revoked_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
