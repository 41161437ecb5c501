use crate::{Db, types::AuctionRow};
use acp_core::{
    models::{AuctionQuery, Bid},
    ports::{AuctionOf, AuctionRepository},
};

const AUCTION_COLUMNS: &str = r#"
    id,
    artwork_id,
    artist_id,
    start_price,
    current_bid,
    current_bidder,
    json(bids) as bids,
    start_time,
    end_time,
    status,
    created_at
"#;

fn into_record(row: AuctionRow) -> Result<AuctionOf<Db>, sqlx::Error> {
    row.try_into()
}

impl AuctionRepository for Db {
    async fn create_auction(
        &self,
        auction_id: Self::AuctionId,
        artwork_id: Self::ArtworkId,
        artist_id: Self::UserId,
        start_price: i64,
        end_time: Self::DateTime,
        as_of: Self::DateTime,
    ) -> Result<AuctionOf<Self>, Self::Error> {
        let row = sqlx::query_as::<_, AuctionRow>(&format!(
            r#"
            insert into
                auctions (id, artwork_id, artist_id, start_price, current_bid, start_time, end_time, status, created_at)
            values
                ($1, $2, $3, $4, $4, $5, $6, 'ongoing', $5)
            returning
                {AUCTION_COLUMNS}
            "#
        ))
        .bind(auction_id)
        .bind(artwork_id)
        .bind(artist_id)
        .bind(start_price)
        .bind(as_of)
        .bind(end_time)
        .fetch_one(&self.writer)
        .await?;

        into_record(row)
    }

    async fn get_auction(
        &self,
        auction_id: Self::AuctionId,
    ) -> Result<Option<AuctionOf<Self>>, Self::Error> {
        sqlx::query_as::<_, AuctionRow>(&format!(
            "select {AUCTION_COLUMNS} from auctions where id = $1"
        ))
        .bind(auction_id)
        .fetch_optional(&self.reader)
        .await?
        .map(into_record)
        .transpose()
    }

    async fn get_auction_by_artwork(
        &self,
        artwork_id: Self::ArtworkId,
    ) -> Result<Option<AuctionOf<Self>>, Self::Error> {
        sqlx::query_as::<_, AuctionRow>(&format!(
            r#"
            select
                {AUCTION_COLUMNS}
            from
                auctions
            where
                artwork_id = $1
            and
                status = 'ongoing'
            order by
                end_time desc
            limit 1
            "#
        ))
        .bind(artwork_id)
        .fetch_optional(&self.reader)
        .await?
        .map(into_record)
        .transpose()
    }

    async fn query_auctions(
        &self,
        query: AuctionQuery<Self::DateTime, Self::UserId>,
        limit: usize,
        skip: usize,
    ) -> Result<Vec<AuctionOf<Self>>, Self::Error> {
        let mut builder =
            sqlx::QueryBuilder::new(format!("select {AUCTION_COLUMNS} from auctions where "));

        match query {
            AuctionQuery::Ongoing { as_of } => {
                builder
                    .push("status = 'ongoing' and end_time > ")
                    .push_bind(as_of)
                    .push(" order by end_time asc");
            }
            AuctionQuery::Ended => {
                builder.push("status = 'completed' order by end_time desc");
            }
            AuctionQuery::ByArtist { artist_id } => {
                builder
                    .push("artist_id = ")
                    .push_bind(artist_id)
                    .push(" order by end_time asc");
            }
            AuctionQuery::EndingSoon { as_of, within } => {
                builder
                    .push("status = 'ongoing' and end_time > ")
                    .push_bind(as_of)
                    .push(" and end_time <= ")
                    .push_bind(as_of + within)
                    .push(" order by end_time asc");
            }
        }

        // sqlite reads a negative limit as unbounded and a negative offset as 0
        builder
            .push(" limit ")
            .push_bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .push(" offset ")
            .push_bind(i64::try_from(skip).unwrap_or(i64::MAX));

        builder
            .build_query_as::<AuctionRow>()
            .fetch_all(&self.reader)
            .await?
            .into_iter()
            .map(into_record)
            .collect()
    }

    async fn append_bid(
        &self,
        auction_id: Self::AuctionId,
        bid: Bid<Self::DateTime, Self::UserId>,
        observed_bid: i64,
    ) -> Result<Option<AuctionOf<Self>>, Self::Error> {
        // the guard and the mutation are one statement, so a bid validated
        // against a stale current_bid simply matches no row
        let row = sqlx::query_as::<_, AuctionRow>(&format!(
            r#"
            update
                auctions
            set
                bids = json_insert(bids, '$[#]', json($2)),
                current_bid = $3,
                current_bidder = $4
            where
                id = $1
            and
                current_bid = $5
            and
                status = 'ongoing'
            and
                end_time >= $6
            returning
                {AUCTION_COLUMNS}
            "#
        ))
        .bind(auction_id)
        .bind(sqlx::types::Json(&bid))
        .bind(bid.amount)
        .bind(bid.user_id)
        .bind(observed_bid)
        .bind(bid.time)
        .fetch_optional(&self.writer)
        .await?;

        row.map(into_record).transpose()
    }

    async fn complete_auction(&self, auction_id: Self::AuctionId) -> Result<bool, Self::Error> {
        let result = sqlx::query("update auctions set status = 'completed' where id = $1")
            .bind(auction_id)
            .execute(&self.writer)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn complete_expired_auctions(&self, as_of: Self::DateTime) -> Result<u64, Self::Error> {
        let result = sqlx::query(
            r#"
            update
                auctions
            set
                status = 'completed'
            where
                status = 'ongoing'
            and
                end_time <= $1
            "#,
        )
        .bind(as_of)
        .execute(&self.writer)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_auction(&self, auction_id: Self::AuctionId) -> Result<bool, Self::Error> {
        let result = sqlx::query("delete from auctions where id = $1")
            .bind(auction_id)
            .execute(&self.writer)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_auctions_by_artist(&self, artist_id: Self::UserId) -> Result<u64, Self::Error> {
        let count: i64 = sqlx::query_scalar("select count(*) from auctions where artist_id = $1")
            .bind(artist_id)
            .fetch_one(&self.reader)
            .await?;

        Ok(count as u64)
    }
}
