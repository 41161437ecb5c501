//! Type definitions for the SQLite implementation.
//!
//! The public types are the id newtypes and the datetime representation used
//! throughout the crate. The crate-private row types mirror the table layouts
//! and are converted into the `acp-core` records on the way out.

use acp_core::models::{
    ArtformData, ArtformRecord, ArtworkData, ArtworkRecord, AuctionRecord, AuctionStatus, Bid,
    UserData, UserRecord, UserRole,
};

mod datetime;
pub use datetime::DateTime;

mod ids;
pub use ids::{ArtformId, ArtworkId, AuctionId, UserId};

fn decode_error(err: impl std::error::Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(err))
}

#[derive(sqlx::FromRow)]
pub(crate) struct AuctionRow {
    pub id: AuctionId,
    pub artwork_id: ArtworkId,
    pub artist_id: UserId,
    pub start_price: i64,
    pub current_bid: i64,
    pub current_bidder: Option<UserId>,
    pub bids: sqlx::types::Json<Vec<Bid<DateTime, UserId>>>,
    pub start_time: DateTime,
    pub end_time: DateTime,
    pub status: String,
    pub created_at: DateTime,
}

impl TryFrom<AuctionRow> for AuctionRecord<DateTime, UserId, ArtworkId, AuctionId> {
    type Error = sqlx::Error;

    fn try_from(row: AuctionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            artwork_id: row.artwork_id,
            artist_id: row.artist_id,
            start_price: row.start_price,
            current_bid: row.current_bid,
            current_bidder: row.current_bidder,
            bids: row.bids.0,
            start_time: row.start_time,
            end_time: row.end_time,
            status: row.status.parse::<AuctionStatus>().map_err(decode_error)?,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct ArtworkRow {
    pub id: ArtworkId,
    pub artist_id: UserId,
    pub artform_id: ArtformId,
    pub title: String,
    pub description: String,
    pub final_image_url: String,
    pub price: i64,
    pub for_sale: bool,
    pub is_auction: bool,
    pub auction_id: Option<AuctionId>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl From<ArtworkRow> for ArtworkRecord<DateTime, UserId, ArtformId, ArtworkId, AuctionId> {
    fn from(row: ArtworkRow) -> Self {
        Self {
            id: row.id,
            artist_id: row.artist_id,
            artform_id: row.artform_id,
            data: ArtworkData {
                title: row.title,
                description: row.description,
                final_image_url: row.final_image_url,
                price: row.price,
                for_sale: row.for_sale,
            },
            is_auction: row.is_auction,
            auction_id: row.auction_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct ArtformRow {
    pub id: ArtformId,
    pub name: String,
    pub state: String,
    pub history: String,
    pub created_at: DateTime,
}

impl From<ArtformRow> for ArtformRecord<DateTime, ArtformId> {
    fn from(row: ArtformRow) -> Self {
        Self {
            id: row.id,
            data: ArtformData {
                name: row.name,
                state: row.state,
                history: row.history,
            },
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct UserRow {
    pub id: UserId,
    pub subject: String,
    pub role: String,
    pub name: String,
    pub profile_pic: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime,
}

impl TryFrom<UserRow> for UserRecord<DateTime, UserId> {
    type Error = sqlx::Error;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            data: UserData {
                subject: row.subject,
                role: row.role.parse::<UserRole>().map_err(decode_error)?,
                name: row.name,
                profile_pic: row.profile_pic,
                bio: row.bio,
            },
            created_at: row.created_at,
        })
    }
}
