/// The caller-supplied fields of a new artwork.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ArtworkData {
    /// Display title
    pub title: String,
    /// Free-form description
    pub description: String,
    /// Location of the finished piece's image
    pub final_image_url: String,
    /// Asking price for direct sale
    pub price: i64,
    /// Whether the artwork may be bought directly
    pub for_sale: bool,
}

/// An artwork, as far as the auction subsystem is concerned.
///
/// `is_auction` and `auction_id` form the artwork linkage: they are written by
/// the auction lifecycle manager and otherwise owned by the artwork collaborator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ArtworkRecord<DateTime, UserId, ArtformId, ArtworkId, AuctionId> {
    /// The unique identifier of the artwork
    pub id: ArtworkId,
    /// The owning artist
    pub artist_id: UserId,
    /// The artform the piece belongs to
    pub artform_id: ArtformId,
    /// The caller-supplied fields
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub data: ArtworkData,
    /// Whether the artwork is currently linked to an auction
    pub is_auction: bool,
    /// The linked auction, if any
    pub auction_id: Option<AuctionId>,
    /// When the record was created
    pub created_at: DateTime,
    /// When the record was last modified
    pub updated_at: DateTime,
}

/// The caller-supplied fields of a new artform.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArtformData {
    /// e.g. "Warli"
    pub name: String,
    /// The region the artform comes from
    pub state: String,
    /// Curated background
    pub history: String,
}

/// A traditional artform.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ArtformRecord<DateTime, ArtformId> {
    /// The unique identifier of the artform
    pub id: ArtformId,
    /// The caller-supplied fields
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub data: ArtformData,
    /// When the record was created
    pub created_at: DateTime,
}
