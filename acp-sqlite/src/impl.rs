//! Repository trait implementations for the SQLite database.

use crate::{
    Db,
    types::{ArtformId, ArtworkId, AuctionId, DateTime, UserId},
};
use acp_core::ports::Repository;

mod artform;
mod artwork;
mod auction;
mod user;

impl Repository for Db {
    type Error = sqlx::Error;
    type DateTime = DateTime;
    type UserId = UserId;
    type ArtformId = ArtformId;
    type ArtworkId = ArtworkId;
    type AuctionId = AuctionId;
}
