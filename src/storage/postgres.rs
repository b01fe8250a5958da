// PostgreSQL storage backend over a diesel-async + bb8 pool.
//
// Counter increments are single `SET col = col + 1 ... RETURNING` statements,
// so they are atomic at the row level even under concurrent writers.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::OptionalExtension;
use bb8::PooledConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::db::DieselPool;
use crate::models::{Ad, NewAd, NewUser, UpdateAdRequest, User};
use crate::schema::{ads, users};

use super::{Storage, StorageError};

pub struct PgStorage {
    pool: DieselPool,
}

impl PgStorage {
    pub fn new(pool: DieselPool) -> Self {
        PgStorage { pool }
    }

    async fn conn(
        &self,
    ) -> Result<PooledConnection<'_, AsyncDieselConnectionManager<AsyncPgConnection>>, StorageError>
    {
        self.pool
            .get()
            .await
            .map_err(|e| StorageError::Pool(e.to_string()))
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn create_user(&self, user: NewUser) -> Result<User, StorageError> {
        let mut conn = self.conn().await?;
        let user = diesel::insert_into(users::table)
            .values(&user)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await?;
        Ok(user)
    }

    async fn user(&self, id: i32) -> Result<Option<User>, StorageError> {
        let mut conn = self.conn().await?;
        let user = users::table
            .find(id)
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(user)
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        let mut conn = self.conn().await?;
        let user = users::table
            .filter(users::username.eq(username))
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(user)
    }

    async fn user_by_npub(&self, npub: &str) -> Result<Option<User>, StorageError> {
        let mut conn = self.conn().await?;
        let user = users::table
            .filter(users::npub.eq(npub))
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(user)
    }

    async fn create_ad(&self, ad: NewAd) -> Result<Ad, StorageError> {
        let mut conn = self.conn().await?;
        let ad = diesel::insert_into(ads::table)
            .values(&ad)
            .returning(Ad::as_returning())
            .get_result(&mut conn)
            .await?;
        Ok(ad)
    }

    async fn ad(&self, id: i32) -> Result<Option<Ad>, StorageError> {
        let mut conn = self.conn().await?;
        let ad = ads::table
            .find(id)
            .select(Ad::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(ad)
    }

    async fn ads_by_user(&self, user_id: i32) -> Result<Vec<Ad>, StorageError> {
        let mut conn = self.conn().await?;
        let ads = ads::table
            .filter(ads::user_id.eq(Some(user_id)))
            .select(Ad::as_select())
            .load(&mut conn)
            .await?;
        Ok(ads)
    }

    async fn all_ads(&self) -> Result<Vec<Ad>, StorageError> {
        let mut conn = self.conn().await?;
        let ads = ads::table.select(Ad::as_select()).load(&mut conn).await?;
        Ok(ads)
    }

    async fn update_ad(
        &self,
        id: i32,
        changes: UpdateAdRequest,
    ) -> Result<Option<Ad>, StorageError> {
        // Diesel rejects an UPDATE with an empty SET clause
        if !changes.has_changes() {
            return self.ad(id).await;
        }

        let mut conn = self.conn().await?;
        let ad = diesel::update(ads::table.find(id))
            .set(&changes)
            .returning(Ad::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?;
        Ok(ad)
    }

    async fn delete_ad(&self, id: i32) -> Result<bool, StorageError> {
        let mut conn = self.conn().await?;
        let deleted = diesel::delete(ads::table.find(id))
            .execute(&mut conn)
            .await?;
        Ok(deleted > 0)
    }

    async fn increment_impressions(&self, id: i32) -> Result<Option<Ad>, StorageError> {
        let mut conn = self.conn().await?;
        let ad = diesel::update(ads::table.find(id))
            .set(ads::impressions.eq(ads::impressions + 1))
            .returning(Ad::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?;
        Ok(ad)
    }

    async fn increment_clicks(&self, id: i32) -> Result<Option<Ad>, StorageError> {
        let mut conn = self.conn().await?;
        let ad = diesel::update(ads::table.find(id))
            .set(ads::clicks.eq(ads::clicks + 1))
            .returning(Ad::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?;
        Ok(ad)
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        // Getting a connection from the pool is sufficient
        let conn = self.conn().await?;
        drop(conn);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgresql"
    }
}
