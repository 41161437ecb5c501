use crate::{Db, types::UserRow};
use acp_core::{
    models::UserData,
    ports::{UserOf, UserRepository},
};

impl UserRepository for Db {
    async fn create_user(
        &self,
        user_id: Self::UserId,
        data: UserData,
        as_of: Self::DateTime,
    ) -> Result<UserOf<Self>, Self::Error> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            insert into
                users (id, subject, role, name, profile_pic, bio, created_at)
            values
                ($1, $2, $3, $4, $5, $6, $7)
            returning
                *
            "#,
        )
        .bind(user_id)
        .bind(data.subject)
        .bind(data.role.as_str())
        .bind(data.name)
        .bind(data.profile_pic)
        .bind(data.bio)
        .bind(as_of)
        .fetch_one(&self.writer)
        .await?;

        row.try_into()
    }

    async fn get_user(&self, user_id: Self::UserId) -> Result<Option<UserOf<Self>>, Self::Error> {
        sqlx::query_as::<_, UserRow>("select * from users where id = $1")
            .bind(user_id)
            .fetch_optional(&self.reader)
            .await?
            .map(TryInto::try_into)
            .transpose()
    }

    async fn get_user_by_subject(
        &self,
        subject: &str,
    ) -> Result<Option<UserOf<Self>>, Self::Error> {
        sqlx::query_as::<_, UserRow>("select * from users where subject = $1")
            .bind(subject)
            .fetch_optional(&self.reader)
            .await?
            .map(TryInto::try_into)
            .transpose()
    }
}
