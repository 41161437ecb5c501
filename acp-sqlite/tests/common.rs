#![allow(dead_code)]

use acp_core::{
    models::{ArtformData, ArtworkData, UserData, UserRole},
    ports::{Application, ArtformRepository, ArtworkRepository, UserRepository},
};
use acp_sqlite::{
    Db,
    config::SqliteConfig,
    types::{ArtworkId, AuctionId, DateTime, UserId},
};

pub struct TestApp(pub Db);

impl TestApp {
    pub async fn open() -> anyhow::Result<Self> {
        Ok(Self(Db::open(&SqliteConfig::default()).await?))
    }
}

impl Application for TestApp {
    type Context = ();
    type Repository = Db;

    fn database(&self) -> &Self::Repository {
        &self.0
    }

    fn now(&self) -> DateTime {
        time::OffsetDateTime::now_utc().into()
    }

    fn generate_auction_id(&self) -> AuctionId {
        uuid::Uuid::new_v4().into()
    }

    async fn principal(&self, _context: &Self::Context) -> Option<String> {
        None
    }

    async fn is_admin(&self, _context: &Self::Context) -> bool {
        false
    }
}

pub async fn create_user(db: &Db, name: &str, role: UserRole) -> anyhow::Result<UserId> {
    let user_id = UserId(uuid::Uuid::new_v4());
    db.create_user(
        user_id,
        UserData {
            subject: format!("subject|{name}"),
            role,
            name: name.to_owned(),
            profile_pic: None,
            bio: None,
        },
        time::OffsetDateTime::now_utc().into(),
    )
    .await?;
    Ok(user_id)
}

/// An artist with one artwork, ready to be auctioned.
pub async fn seed_artwork(db: &Db) -> anyhow::Result<(UserId, ArtworkId)> {
    let now: DateTime = time::OffsetDateTime::now_utc().into();
    let artwork_id = ArtworkId(uuid::Uuid::new_v4());
    let artist_id = create_user(db, &format!("artist-{artwork_id}"), UserRole::Artist).await?;

    let artform_id = uuid::Uuid::new_v4().into();
    db.create_artform(
        artform_id,
        ArtformData {
            name: "Madhubani".into(),
            state: "Bihar".into(),
            history: String::new(),
        },
        now,
    )
    .await?;

    db.create_artwork(
        artwork_id,
        artist_id,
        artform_id,
        ArtworkData {
            title: "Fish Pair".into(),
            description: "Natural pigments on handmade paper".into(),
            final_image_url: "https://img.example/fish.jpg".into(),
            price: 2500,
            for_sale: true,
        },
        now,
    )
    .await?;

    Ok((artist_id, artwork_id))
}
