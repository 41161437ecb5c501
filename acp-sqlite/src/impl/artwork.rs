use crate::{Db, types::ArtworkRow};
use acp_core::{
    models::ArtworkData,
    ports::{ArtworkOf, ArtworkRepository},
};

impl ArtworkRepository for Db {
    async fn create_artwork(
        &self,
        artwork_id: Self::ArtworkId,
        artist_id: Self::UserId,
        artform_id: Self::ArtformId,
        data: ArtworkData,
        as_of: Self::DateTime,
    ) -> Result<ArtworkOf<Self>, Self::Error> {
        let row = sqlx::query_as::<_, ArtworkRow>(
            r#"
            insert into
                artworks (id, artist_id, artform_id, title, description, final_image_url, price, for_sale, created_at, updated_at)
            values
                ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            returning
                *
            "#,
        )
        .bind(artwork_id)
        .bind(artist_id)
        .bind(artform_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.final_image_url)
        .bind(data.price)
        .bind(data.for_sale)
        .bind(as_of)
        .fetch_one(&self.writer)
        .await?;

        Ok(row.into())
    }

    async fn get_artwork(
        &self,
        artwork_id: Self::ArtworkId,
    ) -> Result<Option<ArtworkOf<Self>>, Self::Error> {
        let row = sqlx::query_as::<_, ArtworkRow>("select * from artworks where id = $1")
            .bind(artwork_id)
            .fetch_optional(&self.reader)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn mark_as_in_auction(
        &self,
        artwork_id: Self::ArtworkId,
        auction_id: Self::AuctionId,
        as_of: Self::DateTime,
    ) -> Result<bool, Self::Error> {
        let result = sqlx::query(
            r#"
            update
                artworks
            set
                is_auction = 1,
                auction_id = $2,
                updated_at = $3
            where
                id = $1
            "#,
        )
        .bind(artwork_id)
        .bind(auction_id)
        .bind(as_of)
        .execute(&self.writer)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear_auction_link(
        &self,
        artwork_id: Self::ArtworkId,
        as_of: Self::DateTime,
    ) -> Result<bool, Self::Error> {
        let result = sqlx::query(
            r#"
            update
                artworks
            set
                is_auction = 0,
                auction_id = null,
                updated_at = $2
            where
                id = $1
            "#,
        )
        .bind(artwork_id)
        .bind(as_of)
        .execute(&self.writer)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_artwork(&self, artwork_id: Self::ArtworkId) -> Result<bool, Self::Error> {
        // auctions of the artwork go with it through `on delete cascade`
        let result = sqlx::query("delete from artworks where id = $1")
            .bind(artwork_id)
            .execute(&self.writer)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
