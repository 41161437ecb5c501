//! Response bodies.
//!
//! Records from the repository are never serialized as-is: listings drop the
//! bid history, every auction reports its effective status, and referenced
//! users and artworks are embedded as small summaries.

use crate::{ApiApplication, error::ApiError};
use acp_core::{
    models::{AuctionStatus, UserRecord},
    ports::{
        Application, ArtformRepository as _, ArtworkRepository as _, AuctionOf, Repository,
        UserRepository as _,
    },
};
use schemars::JsonSchema;
use serde::Serialize;

pub(crate) type Repo<T> = <T as Application>::Repository;
pub(crate) type DateTimeOf<T> = <Repo<T> as Repository>::DateTime;
pub(crate) type UserIdOf<T> = <Repo<T> as Repository>::UserId;
pub(crate) type ArtformIdOf<T> = <Repo<T> as Repository>::ArtformId;
pub(crate) type ArtworkIdOf<T> = <Repo<T> as Repository>::ArtworkId;
pub(crate) type AuctionIdOf<T> = <Repo<T> as Repository>::AuctionId;

pub(crate) type AuctionViewOf<T> =
    AuctionView<DateTimeOf<T>, UserIdOf<T>, ArtworkIdOf<T>, AuctionIdOf<T>>;
pub(crate) type ListingOf<T> = AuctionListing<
    DateTimeOf<T>,
    UserIdOf<T>,
    ArtworkIdOf<T>,
    AuctionIdOf<T>,
    ArtformIdOf<T>,
>;
pub(crate) type DetailOf<T> = AuctionDetail<
    DateTimeOf<T>,
    UserIdOf<T>,
    ArtworkIdOf<T>,
    AuctionIdOf<T>,
    ArtformIdOf<T>,
>;

/// An auction without its bid history.
#[derive(Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuctionView<DateTime, UserId, ArtworkId, AuctionId> {
    /// The auction id
    pub id: AuctionId,
    /// The auctioned artwork
    pub artwork_id: ArtworkId,
    /// The artwork's artist
    pub artist_id: UserId,
    /// The floor bid
    pub start_price: i64,
    /// The highest accepted amount so far
    pub current_bid: i64,
    /// The holder of the current bid
    pub current_bidder: Option<UserId>,
    /// How many bids have been accepted
    pub bid_count: usize,
    /// When bidding opened
    pub start_time: DateTime,
    /// When bidding closes
    pub end_time: DateTime,
    /// The status as of the request, `completed` once the end time has passed
    pub status: AuctionStatus,
    /// When the auction was created
    pub created_at: DateTime,
}

impl<DateTime: Ord, UserId, ArtworkId, AuctionId> AuctionView<DateTime, UserId, ArtworkId, AuctionId> {
    pub fn new(
        record: acp_core::models::AuctionRecord<DateTime, UserId, ArtworkId, AuctionId>,
        as_of: &DateTime,
    ) -> Self {
        let status = record.effective_status(as_of);
        Self {
            id: record.id,
            artwork_id: record.artwork_id,
            artist_id: record.artist_id,
            start_price: record.start_price,
            current_bid: record.current_bid,
            current_bidder: record.current_bidder,
            bid_count: record.bids.len(),
            start_time: record.start_time,
            end_time: record.end_time,
            status,
            created_at: record.created_at,
        }
    }
}

/// A user as shown next to an auction.
#[derive(Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserSummary<UserId> {
    pub id: UserId,
    pub name: String,
    pub profile_pic: Option<String>,
}

impl<DateTime, UserId> From<UserRecord<DateTime, UserId>> for UserSummary<UserId> {
    fn from(user: UserRecord<DateTime, UserId>) -> Self {
        Self {
            id: user.id,
            name: user.data.name,
            profile_pic: user.data.profile_pic,
        }
    }
}

/// The artist as shown on an auction's page.
#[derive(Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ArtistProfile<UserId> {
    pub id: UserId,
    pub name: String,
    pub profile_pic: Option<String>,
    pub bio: Option<String>,
}

#[derive(Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ArtworkSummary<ArtworkId, ArtformId> {
    pub id: ArtworkId,
    pub artform_id: ArtformId,
    pub title: String,
    pub description: String,
    pub final_image_url: String,
}

#[derive(Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ArtformSummary<ArtformId> {
    pub id: ArtformId,
    pub name: String,
    pub state: String,
}

/// An auction in a listing, with its artwork, artist and leading bidder.
#[derive(Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuctionListing<DateTime, UserId, ArtworkId, AuctionId, ArtformId> {
    #[serde(flatten)]
    pub auction: AuctionView<DateTime, UserId, ArtworkId, AuctionId>,
    pub artwork: Option<ArtworkSummary<ArtworkId, ArtformId>>,
    pub artist: Option<UserSummary<UserId>>,
    pub bidder: Option<UserSummary<UserId>>,
}

/// One page of a listing.
#[derive(Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuctionPage<Item> {
    pub auctions: Vec<Item>,
    /// Whether the page was full, so that another page may follow
    pub has_more: bool,
}

#[derive(Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BidView<DateTime, UserId> {
    pub user_id: UserId,
    pub amount: i64,
    pub time: DateTime,
    pub bidder: Option<UserSummary<UserId>>,
}

/// Everything an auction's page shows.
#[derive(Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuctionDetail<DateTime, UserId, ArtworkId, AuctionId, ArtformId> {
    pub auction: AuctionView<DateTime, UserId, ArtworkId, AuctionId>,
    pub artwork: Option<ArtworkSummary<ArtworkId, ArtformId>>,
    pub artist: Option<ArtistProfile<UserId>>,
    pub artform: Option<ArtformSummary<ArtformId>>,
    /// Every accepted bid, oldest first
    pub bids: Vec<BidView<DateTime, UserId>>,
    pub current_bidder: Option<UserSummary<UserId>>,
}

async fn user<T: ApiApplication>(
    app: &T,
    user_id: UserIdOf<T>,
) -> Result<Option<UserRecord<DateTimeOf<T>, UserIdOf<T>>>, ApiError> {
    app.database()
        .get_user(user_id)
        .await
        .map_err(|err| ApiError::internal(err, "failed to get user"))
}

async fn artwork_summary<T: ApiApplication>(
    app: &T,
    artwork_id: ArtworkIdOf<T>,
) -> Result<Option<ArtworkSummary<ArtworkIdOf<T>, ArtformIdOf<T>>>, ApiError> {
    let artwork = app
        .database()
        .get_artwork(artwork_id)
        .await
        .map_err(|err| ApiError::internal(err, "failed to get artwork"))?;

    Ok(artwork.map(|artwork| ArtworkSummary {
        id: artwork.id,
        artform_id: artwork.artform_id,
        title: artwork.data.title,
        description: artwork.data.description,
        final_image_url: artwork.data.final_image_url,
    }))
}

/// Embed the artwork, artist and leading bidder of an auction.
pub(crate) async fn listing<T: ApiApplication>(
    app: &T,
    auction: AuctionOf<Repo<T>>,
    as_of: &DateTimeOf<T>,
) -> Result<ListingOf<T>, ApiError> {
    let artwork = artwork_summary(app, auction.artwork_id.clone()).await?;
    let artist = user(app, auction.artist_id.clone()).await?;
    let bidder = match auction.current_bidder.clone() {
        Some(bidder_id) => user(app, bidder_id).await?,
        None => None,
    };

    Ok(AuctionListing {
        auction: AuctionView::new(auction, as_of),
        artwork,
        artist: artist.map(Into::into),
        bidder: bidder.map(Into::into),
    })
}

/// Assemble an auction's page, resolving every bidder once.
pub(crate) async fn detail<T: ApiApplication>(
    app: &T,
    auction: AuctionOf<Repo<T>>,
    as_of: &DateTimeOf<T>,
) -> Result<DetailOf<T>, ApiError> {
    let artwork = artwork_summary(app, auction.artwork_id.clone()).await?;

    let artform = match &artwork {
        Some(artwork) => app
            .database()
            .get_artform(artwork.artform_id.clone())
            .await
            .map_err(|err| ApiError::internal(err, "failed to get artform"))?
            .map(|artform| ArtformSummary {
                id: artform.id,
                name: artform.data.name,
                state: artform.data.state,
            }),
        None => None,
    };

    let artist = user(app, auction.artist_id.clone())
        .await?
        .map(|artist| ArtistProfile {
            id: artist.id,
            name: artist.data.name,
            profile_pic: artist.data.profile_pic,
            bio: artist.data.bio,
        });

    let mut bidders: Vec<(UserIdOf<T>, Option<UserRecord<DateTimeOf<T>, UserIdOf<T>>>)> =
        Vec::new();
    let mut bids = Vec::with_capacity(auction.bids.len());
    for bid in &auction.bids {
        let known = bidders.iter().find(|(id, _)| *id == bid.user_id);
        let record = match known {
            Some((_, record)) => record.clone(),
            None => {
                let record = user(app, bid.user_id.clone()).await?;
                bidders.push((bid.user_id.clone(), record.clone()));
                record
            }
        };
        bids.push(BidView {
            user_id: bid.user_id.clone(),
            amount: bid.amount,
            time: bid.time.clone(),
            bidder: record.map(Into::into),
        });
    }

    let current_bidder = match auction.current_bidder.clone() {
        Some(bidder_id) => match bidders.into_iter().find(|(id, _)| *id == bidder_id) {
            Some((_, record)) => record,
            None => user(app, bidder_id).await?,
        },
        None => None,
    }
    .map(Into::into);

    Ok(AuctionDetail {
        auction: AuctionView::new(auction, as_of),
        artwork,
        artist,
        artform,
        bids,
        current_bidder,
    })
}
