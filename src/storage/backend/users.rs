use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use super::converters::{model_to_user, user_to_active_model};
use super::{SeaOrmStorage, retry};
use crate::errors::{LinklyticsError, Result};
use crate::storage::User;
use migration::entities::user;

impl SeaOrmStorage {
    /// 邮箱已存在时返回 UserExists
    pub async fn insert_user(&self, new_user: &User) -> Result<()> {
        let db = &self.db;
        let model = user_to_active_model(new_user);

        retry::with_retry("insert_user", self.retry_config, || {
            let model = model.clone();
            async move { user::Entity::insert(model).exec(db).await }
        })
        .await
        .map_err(|e| {
            if retry::is_unique_violation(&e) {
                LinklyticsError::user_exists(format!("User '{}' already exists", new_user.email))
            } else {
                LinklyticsError::database_operation(format!("Failed to insert user: {}", e))
            }
        })?;

        Ok(())
    }

    /// email 需已小写
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let db = &self.db;
        let model = retry::with_retry("find_user_by_email", self.retry_config, || async {
            user::Entity::find()
                .filter(user::Column::Email.eq(email))
                .one(db)
                .await
        })
        .await?;

        Ok(model.map(model_to_user))
    }

    pub async fn update_user_password(&self, user_id: &str, password_hash: &str) -> Result<()> {
        let db = &self.db;
        let result = retry::with_retry("update_user_password", self.retry_config, || async {
            user::Entity::update_many()
                .col_expr(user::Column::PasswordHash, Expr::value(password_hash))
                .filter(user::Column::Id.eq(user_id))
                .exec(db)
                .await
        })
        .await?;

        if result.rows_affected == 0 {
            return Err(LinklyticsError::not_found(format!(
                "User '{}' not found",
                user_id
            )));
        }
        Ok(())
    }
}
