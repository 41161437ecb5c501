use crate::{Db, types::ArtformRow};
use acp_core::{
    models::ArtformData,
    ports::{ArtformOf, ArtformRepository},
};

impl ArtformRepository for Db {
    async fn create_artform(
        &self,
        artform_id: Self::ArtformId,
        data: ArtformData,
        as_of: Self::DateTime,
    ) -> Result<ArtformOf<Self>, Self::Error> {
        let row = sqlx::query_as::<_, ArtformRow>(
            r#"
            insert into
                artforms (id, name, state, history, created_at)
            values
                ($1, $2, $3, $4, $5)
            returning
                *
            "#,
        )
        .bind(artform_id)
        .bind(data.name)
        .bind(data.state)
        .bind(data.history)
        .bind(as_of)
        .fetch_one(&self.writer)
        .await?;

        Ok(row.into())
    }

    async fn get_artform(
        &self,
        artform_id: Self::ArtformId,
    ) -> Result<Option<ArtformOf<Self>>, Self::Error> {
        let row = sqlx::query_as::<_, ArtformRow>("select * from artforms where id = $1")
            .bind(artform_id)
            .fetch_optional(&self.reader)
            .await?;

        Ok(row.map(Into::into))
    }
}
