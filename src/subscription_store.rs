use sqlx::SqlitePool;

use crate::domain::Subscriber;

/// Key-value table of subscriber records, keyed by email.
#[derive(Debug, Clone)]
pub struct SubscriptionStore {
    pool: SqlitePool,
}

impl SubscriptionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts the record, replacing the location of an existing email.
    #[tracing::instrument(
        name = "Saving subscriber details in the store",
        skip(self, subscriber),
        fields(
            subscriber_email = %subscriber.email,
            subscriber_location = %subscriber.location
        )
    )]
    pub async fn put(&self, subscriber: &Subscriber) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO subscriptions (email, location)
            VALUES ($1, $2)
            ON CONFLICT (email) DO UPDATE SET location = excluded.location
            "#,
        )
        .bind(subscriber.email.as_ref())
        .bind(subscriber.location.as_ref())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            e
        })?;
        Ok(())
    }

    /// Reads every record in a single query.
    ///
    /// There is no pagination: the whole table is loaded into memory. Rows
    /// that do not parse into a [`Subscriber`] are returned as errors so the
    /// caller can skip them.
    #[tracing::instrument(name = "Loading all subscribers", skip(self))]
    pub async fn scan(&self) -> Result<Vec<Result<Subscriber, anyhow::Error>>, sqlx::Error> {
        let rows: Vec<(String, String)> =
            sqlx::query_as(r#"SELECT email, location FROM subscriptions"#)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to execute query: {:?}", e);
                    e
                })?;

        let subscribers = rows
            .into_iter()
            .map(|(email, location)| {
                Subscriber::parse(email, location).map_err(|e| anyhow::anyhow!(e))
            })
            .collect();
        Ok(subscribers)
    }
}
