use super::Permissions;
use acp_core::ports::Application;
use acp_sqlite::{
    Db,
    types::{AuctionId, DateTime},
};
use headers::{Authorization, authorization::Bearer};

#[derive(Clone)]
pub struct TestApp(pub Db);

impl TestApp {
    fn permissions(&self, context: &Authorization<Bearer>) -> Option<Permissions> {
        context.0.token().parse().ok()
    }
}

impl Application for TestApp {
    // We stuff plain-text declarations of the caller into the token
    type Context = Authorization<Bearer>;
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

    async fn principal(&self, context: &Self::Context) -> Option<String> {
        self.permissions(context).and_then(|p| p.subject)
    }

    async fn is_admin(&self, context: &Self::Context) -> bool {
        self.permissions(context).map(|p| p.admin).unwrap_or(false)
    }
}
