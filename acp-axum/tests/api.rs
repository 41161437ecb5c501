use acp_axum::{config::AxumConfig, router};
use acp_core::{
    config::AuctionConfig,
    models::{ArtformData, ArtworkData, UserData, UserRole},
    ports::{ArtformRepository, ArtworkRepository, AuctionRepository, UserRepository},
};
use acp_sqlite::{
    Db,
    config::SqliteConfig,
    types::{ArtworkId, AuctionId, DateTime, UserId},
};
use axum::http::StatusCode;
use axum_test::TestServer;
use rstest::*;
use serde_json::{Value, json};
use std::time::Duration;

mod app;
use app::{Permissions, TestApp};

const HOUR: Duration = Duration::from_secs(3600);

struct Fixture {
    server: TestServer,
    db: Db,
    artist: UserId,
    artwork: ArtworkId,
}

fn now() -> DateTime {
    time::OffsetDateTime::now_utc().into()
}

fn token(subject: &str) -> String {
    Permissions::user(subject).to_string()
}

fn admin_token() -> String {
    Permissions {
        subject: Some("curator".to_owned()),
        admin: true,
    }
    .to_string()
}

async fn register(db: &Db, subject: &str, role: UserRole) -> UserId {
    let user_id = UserId(uuid::Uuid::new_v4());
    db.create_user(
        user_id,
        UserData {
            subject: subject.to_owned(),
            role,
            name: subject.to_uppercase(),
            profile_pic: None,
            bio: Some(format!("{subject} works in Pune")),
        },
        now(),
    )
    .await
    .unwrap();
    user_id
}

async fn add_artwork(db: &Db, artist: UserId) -> ArtworkId {
    let artform_id = uuid::Uuid::new_v4().into();
    db.create_artform(
        artform_id,
        ArtformData {
            name: "Gond".into(),
            state: "Madhya Pradesh".into(),
            history: String::new(),
        },
        now(),
    )
    .await
    .unwrap();

    let artwork_id = ArtworkId(uuid::Uuid::new_v4());
    db.create_artwork(
        artwork_id,
        artist,
        artform_id,
        ArtworkData {
            title: "Peacock at Dusk".into(),
            description: "Acrylic on canvas".into(),
            final_image_url: "https://img.example/peacock.jpg".into(),
            price: 8000,
            for_sale: true,
        },
        now(),
    )
    .await
    .unwrap();
    artwork_id
}

async fn setup() -> Fixture {
    let db = Db::open(&SqliteConfig::default()).await.unwrap();

    let artist = register(&db, "artist", UserRole::Artist).await;
    register(&db, "rival", UserRole::Artist).await;
    register(&db, "alice", UserRole::Student).await;
    register(&db, "bob", UserRole::Student).await;
    register(&db, "curator", UserRole::Admin).await;
    let artwork = add_artwork(&db, artist).await;

    let (router, _) = router(
        TestApp(db.clone()),
        AxumConfig::default(),
        AuctionConfig::default(),
    );
    let server = TestServer::new(router).unwrap();

    Fixture {
        server,
        db,
        artist,
        artwork,
    }
}

async fn open_auction(fixture: &Fixture, start_price: i64) -> String {
    let response = fixture
        .server
        .post("/auctions")
        .authorization_bearer(token("artist"))
        .json(&json!({
            "artworkId": fixture.artwork,
            "startPrice": start_price,
            "endTime": now() + HOUR,
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    body["auction"]["id"].as_str().unwrap().to_owned()
}

async fn bid(fixture: &Fixture, auction_id: &str, subject: &str, amount: i64) -> (StatusCode, Value) {
    let response = fixture
        .server
        .post(&format!("/auctions/{auction_id}/bid"))
        .authorization_bearer(token(subject))
        .json(&json!({ "amount": amount }))
        .await;
    (response.status_code(), response.json())
}

// Without a multithreaded runtime, the tests cannot make progress
#[rstest]
#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 2))]
async fn test_health() {
    let fixture = setup().await;
    let response = fixture.server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "status": "ok" }));
}

#[rstest]
#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 2))]
async fn test_create_and_read_auction() {
    let fixture = setup().await;
    let auction_id = open_auction(&fixture, 1000).await;

    let listing: Value = fixture.server.get("/auctions").await.json();
    assert_eq!(listing["hasMore"], json!(false));
    let auctions = listing["auctions"].as_array().unwrap();
    assert_eq!(auctions.len(), 1);
    assert_eq!(auctions[0]["id"], json!(auction_id));
    assert_eq!(auctions[0]["currentBid"], json!(1000));
    assert_eq!(auctions[0]["status"], json!("ongoing"));
    assert_eq!(auctions[0]["artwork"]["title"], json!("Peacock at Dusk"));
    assert_eq!(auctions[0]["artist"]["name"], json!("ARTIST"));
    assert!(auctions[0].get("bids").is_none());

    let response = fixture.server.get(&format!("/auctions/{auction_id}")).await;
    response.assert_status_ok();
    let detail: Value = response.json();
    assert_eq!(detail["artform"]["name"], json!("Gond"));
    assert_eq!(detail["artist"]["bio"], json!("artist works in Pune"));
    assert_eq!(detail["bids"], json!([]));
    assert_eq!(detail["currentBidder"], Value::Null);

    let artwork = fixture.db.get_artwork(fixture.artwork).await.unwrap().unwrap();
    assert!(artwork.is_auction);
    assert_eq!(
        artwork.auction_id.map(|id| id.to_string()),
        Some(auction_id)
    );

    let by_artist: Value = fixture
        .server
        .get("/auctions")
        .add_query_param("artistId", fixture.artist)
        .await
        .json();
    assert_eq!(by_artist["auctions"].as_array().unwrap().len(), 1);
}

#[rstest]
#[case::student("alice", StatusCode::FORBIDDEN, "forbidden")]
#[case::not_the_owner("rival", StatusCode::FORBIDDEN, "forbidden")]
#[case::unregistered("stranger", StatusCode::NOT_FOUND, "not_found")]
#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 2))]
async fn test_create_requires_the_owning_artist(
    #[case] subject: &str,
    #[case] status: StatusCode,
    #[case] kind: &str,
) {
    let fixture = setup().await;
    let response = fixture
        .server
        .post("/auctions")
        .authorization_bearer(token(subject))
        .json(&json!({
            "artworkId": fixture.artwork,
            "startPrice": 500,
            "endTime": now() + HOUR,
        }))
        .expect_failure()
        .await;
    response.assert_status(status);
    assert_eq!(response.json::<Value>()["error"], json!(kind));
}

#[rstest]
#[case::missing_price(json!({ "endTime": "2999-01-01T00:00:00Z" }), "missing_field")]
#[case::zero_price(json!({ "startPrice": 0, "endTime": "2999-01-01T00:00:00Z" }), "invalid_start_price")]
#[case::fractional_price(json!({ "startPrice": 10.5, "endTime": "2999-01-01T00:00:00Z" }), "invalid_start_price")]
#[case::malformed_end(json!({ "startPrice": 100, "endTime": "tomorrow" }), "invalid_request")]
#[case::past_end(json!({ "startPrice": 100, "endTime": "2001-01-01T00:00:00Z" }), "invalid_end_time")]
#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 2))]
async fn test_create_validates_terms(#[case] mut body: Value, #[case] kind: &str) {
    let fixture = setup().await;
    body["artworkId"] = json!(fixture.artwork);

    let response = fixture
        .server
        .post("/auctions")
        .authorization_bearer(token("artist"))
        .json(&body)
        .expect_failure()
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], json!(kind));
}

#[rstest]
#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 2))]
async fn test_second_auction_conflicts() {
    let fixture = setup().await;
    open_auction(&fixture, 1000).await;

    let response = fixture
        .server
        .post("/auctions")
        .authorization_bearer(token("artist"))
        .json(&json!({
            "artworkId": fixture.artwork,
            "startPrice": 2000,
            "endTime": now() + HOUR,
        }))
        .expect_failure()
        .await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["error"], json!("already_in_auction"));
}

#[rstest]
#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 2))]
async fn test_unauthenticated_requests() {
    let fixture = setup().await;
    let auction_id = open_auction(&fixture, 1000).await;

    let response = fixture
        .server
        .post(&format!("/auctions/{auction_id}/bid"))
        .authorization_bearer(Permissions::default().to_string())
        .json(&json!({ "amount": 5000 }))
        .expect_failure()
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["error"], json!("unauthorized"));
}

#[rstest]
#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 2))]
async fn test_bid_sequence() {
    let fixture = setup().await;
    let auction_id = open_auction(&fixture, 1000).await;

    let (status, body) = bid(&fixture, &auction_id, "alice", 1200).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["currentBid"], json!(1200));

    let (status, body) = bid(&fixture, &auction_id, "bob", 1100).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("bid_too_low"));

    assert_eq!(bid(&fixture, &auction_id, "bob", 1300).await.0, StatusCode::OK);
    assert_eq!(bid(&fixture, &auction_id, "alice", 1400).await.0, StatusCode::OK);

    let detail: Value = fixture
        .server
        .get(&format!("/auctions/{auction_id}"))
        .await
        .json();
    let amounts: Vec<i64> = detail["bids"]
        .as_array()
        .unwrap()
        .iter()
        .map(|bid| bid["amount"].as_i64().unwrap())
        .collect();
    assert_eq!(amounts, vec![1200, 1300, 1400]);
    assert_eq!(detail["bids"][1]["bidder"]["name"], json!("BOB"));
    assert_eq!(detail["auction"]["currentBid"], json!(1400));
    assert_eq!(detail["currentBidder"]["name"], json!("ALICE"));
}

#[rstest]
#[case::zero(0, "invalid_amount")]
#[case::negative(-10, "invalid_amount")]
#[case::equal(1000, "bid_too_low")]
#[case::below(999, "bid_too_low")]
#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 2))]
async fn test_bid_rejections(#[case] amount: i64, #[case] kind: &str) {
    let fixture = setup().await;
    let auction_id = open_auction(&fixture, 1000).await;

    let (status, body) = bid(&fixture, &auction_id, "alice", amount).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!(kind));

    let detail: Value = fixture
        .server
        .get(&format!("/auctions/{auction_id}"))
        .await
        .json();
    assert_eq!(detail["auction"]["currentBid"], json!(1000));
    assert_eq!(detail["bids"], json!([]));
}

#[rstest]
#[case::fraction(json!({ "amount": 1500.5 }), "invalid_amount")]
#[case::text(json!({ "amount": "abc" }), "invalid_amount")]
#[case::null(json!({ "amount": null }), "missing_field")]
#[case::not_an_object(json!("1500"), "invalid_request")]
#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 2))]
async fn test_malformed_bid_body(#[case] body: Value, #[case] kind: &str) {
    let fixture = setup().await;
    let auction_id = open_auction(&fixture, 1000).await;

    let response = fixture
        .server
        .post(&format!("/auctions/{auction_id}/bid"))
        .authorization_bearer(token("alice"))
        .json(&body)
        .expect_failure()
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], json!(kind));

    let detail: Value = fixture
        .server
        .get(&format!("/auctions/{auction_id}"))
        .await
        .json();
    assert_eq!(detail["bids"], json!([]));
}

#[rstest]
#[case::read("get", "/auctions/not-a-uuid")]
#[case::bid("post", "/auctions/not-a-uuid/bid")]
#[case::end("post", "/auctions/not-a-uuid/end")]
#[case::remove_artwork("delete", "/artworks/not-a-uuid")]
#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 2))]
async fn test_malformed_path_id(#[case] method: &str, #[case] path: &str) {
    let fixture = setup().await;
    let request = match method {
        "get" => fixture.server.get(path),
        "delete" => fixture.server.delete(path),
        _ => fixture.server.post(path).json(&json!({ "amount": 5000 })),
    };

    let response = request
        .authorization_bearer(token("artist"))
        .expect_failure()
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], json!("invalid_request"));
}

#[rstest]
#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 2))]
async fn test_bid_on_unknown_auction() {
    let fixture = setup().await;
    let unknown = AuctionId(uuid::Uuid::new_v4());
    let (status, body) = bid(&fixture, &unknown.to_string(), "alice", 5000).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("not_found"));
}

#[rstest]
#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 2))]
async fn test_end_auction() {
    let fixture = setup().await;
    let auction_id = open_auction(&fixture, 1000).await;
    let path = format!("/auctions/{auction_id}/end");

    fixture
        .server
        .post(&path)
        .authorization_bearer(token("alice"))
        .expect_failure()
        .await
        .assert_status(StatusCode::FORBIDDEN);

    for _ in 0..2 {
        let response = fixture
            .server
            .post(&path)
            .authorization_bearer(token("artist"))
            .await;
        response.assert_status_ok();
        response.assert_json(&json!({ "success": true }));
    }

    let (status, body) = bid(&fixture, &auction_id, "alice", 5000).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("auction_closed"));

    let ended: Value = fixture
        .server
        .get("/auctions")
        .add_query_param("status", "ended")
        .await
        .json();
    assert_eq!(ended["auctions"][0]["id"], json!(auction_id));
    assert_eq!(ended["auctions"][0]["status"], json!("completed"));

    let ongoing: Value = fixture.server.get("/auctions").await.json();
    assert_eq!(ongoing["auctions"], json!([]));
}

#[rstest]
#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 2))]
async fn test_expired_auction_and_sweep() {
    let fixture = setup().await;

    // an auction whose end time has already passed, as the sweep would find it
    let started = now();
    let auction_id = AuctionId(uuid::Uuid::new_v4());
    fixture
        .db
        .create_auction(
            auction_id,
            fixture.artwork,
            fixture.artist,
            1000,
            started + Duration::from_millis(1),
            started,
        )
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let detail: Value = fixture
        .server
        .get(&format!("/auctions/{auction_id}"))
        .await
        .json();
    assert_eq!(detail["auction"]["status"], json!("completed"));

    let (status, body) = bid(&fixture, &auction_id.to_string(), "alice", 5000).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("auction_closed"));

    fixture
        .server
        .post("/auctions/sweep")
        .authorization_bearer(token("alice"))
        .expect_failure()
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let response = fixture
        .server
        .post("/auctions/sweep")
        .authorization_bearer(admin_token())
        .await;
    response.assert_json(&json!({ "completed": 1 }));

    let response = fixture
        .server
        .post("/auctions/sweep")
        .authorization_bearer(admin_token())
        .await;
    response.assert_json(&json!({ "completed": 0 }));
}

#[rstest]
#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 2))]
async fn test_admin_role_or_claim_is_enough() {
    let fixture = setup().await;
    let auction_id = open_auction(&fixture, 1000).await;

    // the curator has the admin role but a token without the admin claim
    let response = fixture
        .server
        .post("/auctions/sweep")
        .authorization_bearer(token("curator"))
        .await;
    response.assert_json(&json!({ "completed": 0 }));

    fixture
        .server
        .post(&format!("/auctions/{auction_id}/end"))
        .authorization_bearer(token("curator"))
        .await
        .assert_status_ok();

    // a student whose token carries the admin claim
    let claimed = Permissions {
        subject: Some("bob".to_owned()),
        admin: true,
    }
    .to_string();
    let response = fixture
        .server
        .post("/auctions/sweep")
        .authorization_bearer(claimed.clone())
        .await;
    response.assert_json(&json!({ "completed": 0 }));

    fixture
        .server
        .delete(&format!("/artworks/{}", fixture.artwork))
        .authorization_bearer(claimed)
        .await
        .assert_status(StatusCode::NO_CONTENT);
}

#[rstest]
#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 2))]
async fn test_ending_soon() {
    let fixture = setup().await;
    let auction_id = open_auction(&fixture, 1000).await;

    let soon: Value = fixture.server.get("/auctions/ending-soon").await.json();
    assert_eq!(soon["auctions"][0]["id"], json!(auction_id));

    let later_artwork = add_artwork(&fixture.db, fixture.artist).await;
    fixture
        .server
        .post("/auctions")
        .authorization_bearer(token("artist"))
        .json(&json!({
            "artworkId": later_artwork,
            "startPrice": 10,
            "endTime": now() + HOUR * 48,
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let soon: Value = fixture
        .server
        .get("/auctions/ending-soon")
        .add_query_param("hours", 2)
        .await
        .json();
    assert_eq!(soon["auctions"].as_array().unwrap().len(), 1);

    let all: Value = fixture
        .server
        .get("/auctions/ending-soon")
        .add_query_param("hours", 72)
        .add_query_param("limit", 1)
        .await
        .json();
    assert_eq!(all["auctions"].as_array().unwrap().len(), 1);
    assert_eq!(all["hasMore"], json!(true));
}

#[rstest]
#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 2))]
async fn test_remove_artwork() {
    let fixture = setup().await;
    let auction_id = open_auction(&fixture, 1000).await;
    let path = format!("/artworks/{}", fixture.artwork);

    fixture
        .server
        .delete(&path)
        .authorization_bearer(token("rival"))
        .expect_failure()
        .await
        .assert_status(StatusCode::FORBIDDEN);

    fixture
        .server
        .delete(&path)
        .authorization_bearer(token("artist"))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    fixture
        .server
        .get(&format!("/auctions/{auction_id}"))
        .expect_failure()
        .await
        .assert_status(StatusCode::NOT_FOUND);

    fixture
        .server
        .delete(&path)
        .authorization_bearer(token("artist"))
        .expect_failure()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[rstest]
#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 2))]
async fn test_docs() {
    let fixture = setup().await;
    let response = fixture.server.get("/docs/api.json").await;
    response.assert_status_ok();
    let api: Value = response.json();
    assert!(api["paths"]["/auctions/{auction_id}/bid"].is_object());
}
