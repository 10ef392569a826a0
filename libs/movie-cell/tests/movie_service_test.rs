use std::sync::Arc;
use assert_matches::assert_matches;
use chrono::NaiveDate;
use serde_json::json;
use tokio::sync::broadcast::error::TryRecvError;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path, header, body_json};

use movie_cell::{MovieQuery, MovieRequest, MovieService, PosterUpload, SortDirection};
use shared_gateway::ApiClient;
use shared_models::error::AppError;
use shared_session::{MemorySessionStore, SessionContext, SessionInvalidated};
use shared_utils::test_utils::{TestConfig, TestUser, JwtTestUtils, MockApiResponses};

fn create_service(server: &MockServer, token: Option<&str>) -> (MovieService, SessionContext) {
    let store = match token {
        Some(t) => MemorySessionStore::with_token(t),
        None => MemorySessionStore::new(),
    };
    let session = SessionContext::new(Arc::new(store));
    let config = TestConfig::with_server(&server.uri()).to_app_config();
    let api = ApiClient::new(&config, session.clone()).unwrap();
    (MovieService::new(api), session)
}

fn sample_request() -> MovieRequest {
    MovieRequest {
        title: "Arrival".to_string(),
        genre: "Sci-Fi".to_string(),
        rating: 7.9,
        release_date: NaiveDate::from_ymd_opt(2016, 11, 11).unwrap(),
        poster_url: Some("https://posters.example.com/arrival.jpg".to_string()),
        description: None,
    }
}

#[tokio::test]
async fn test_get_movies_query_string_and_body_unchanged() {
    let mock_server = MockServer::start().await;
    let body = MockApiResponses::movie_page_response(&[1, 2], 0, 12, 2);

    Mock::given(method("GET"))
        .and(path("/api/movies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .mount(&mock_server)
        .await;

    let (service, _) = create_service(&mock_server, None);
    let query = MovieQuery::new().page(0).size(12).sort_by("rating", SortDirection::Desc);

    let page = service.get_movies(&query).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/api/movies");
    assert_eq!(requests[0].url.query(), Some("page=0&size=12&sortBy=rating&direction=DESC"));

    assert_eq!(page.content.len(), 2);
    assert_eq!(page.content[0].title, "The Matrix");
    assert_eq!(serde_json::to_value(&page).unwrap(), body);
}

#[tokio::test]
async fn test_get_movies_with_filters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/movies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockApiResponses::movie_page_response(&[], 0, 10, 0)))
        .mount(&mock_server)
        .await;

    let (service, _) = create_service(&mock_server, None);
    let query = MovieQuery::new()
        .title("dark knight")
        .genre("Action")
        .rating_between(Some(8.0), Some(10.0));

    let page = service.get_movies(&query).await.unwrap();
    assert!(page.empty);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(
        requests[0].url.query(),
        Some("title=dark+knight&genres=Action&minRating=8&maxRating=10")
    );
}

#[tokio::test]
async fn test_get_movie_by_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/movies/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockApiResponses::movie_response(5)))
        .mount(&mock_server)
        .await;

    let (service, _) = create_service(&mock_server, None);
    let movie = service.get_movie_by_id(5).await.unwrap();

    assert_eq!(movie.id, 5);
    assert_eq!(movie.release_date, NaiveDate::from_ymd_opt(1999, 3, 31).unwrap());
    assert_eq!(movie.review_count, Some(2));
}

#[tokio::test]
async fn test_get_movie_not_found_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/movies/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Movie not found" })))
        .mount(&mock_server)
        .await;

    let (service, _) = create_service(&mock_server, None);
    let err = service.get_movie_by_id(404).await.unwrap_err();

    assert_eq!(err, AppError::NotFound("Movie not found".to_string()));
}

#[tokio::test]
async fn test_create_movie_as_admin() {
    let mock_server = MockServer::start().await;
    let token = JwtTestUtils::create_test_token(&TestUser::admin("admin@moviehub.com"), 3600);
    let request = sample_request();

    Mock::given(method("POST"))
        .and(path("/api/movies"))
        .and(header("Authorization", format!("Bearer {}", token)))
        .and(body_json(json!({
            "title": "Arrival",
            "genre": "Sci-Fi",
            "rating": 7.9,
            "releaseDate": "2016-11-11",
            "posterUrl": "https://posters.example.com/arrival.jpg"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 11,
            "title": "Arrival",
            "genre": "Sci-Fi",
            "rating": 7.9,
            "releaseDate": "2016-11-11",
            "posterUrl": "https://posters.example.com/arrival.jpg",
            "description": null,
            "averageReviewRating": null,
            "reviewCount": 0
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (service, _) = create_service(&mock_server, Some(&token));
    let movie = service.create_movie(&request).await.unwrap();

    assert_eq!(movie.id, 11);
    assert_eq!(movie.average_review_rating, None);
}

#[tokio::test]
async fn test_update_movie() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/movies/11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockApiResponses::movie_response(11)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (service, _) = create_service(&mock_server, Some("a.b.c"));
    let movie = service.update_movie(11, &sample_request()).await.unwrap();

    assert_eq!(movie.id, 11);
}

#[tokio::test]
async fn test_delete_movie_and_failure_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/movies/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/movies/2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let (service, _) = create_service(&mock_server, Some("a.b.c"));

    service.delete_movie(1).await.unwrap();
    let err = service.delete_movie(2).await.unwrap_err();
    assert_eq!(err, AppError::Server("Failed to delete movie".to_string()));
}

#[tokio::test]
async fn test_upload_poster_sends_file_part() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/movies/7/poster"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockApiResponses::movie_response(7)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (service, _) = create_service(&mock_server, Some("a.b.c"));
    let poster = PosterUpload::new("poster.png", b"\x89PNG fake image".to_vec());

    let movie = service.upload_poster(7, poster).await.unwrap();
    assert_eq!(movie.id, 7);

    let requests = mock_server.received_requests().await.unwrap();
    let content_type = requests[0].headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data"));

    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"file\""));
    assert!(body.contains("filename=\"poster.png\""));
    assert!(body.contains("image/png"));
    assert!(body.contains("fake image"));
}

#[tokio::test]
async fn test_expired_session_on_admin_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/movies"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let (service, session) = create_service(&mock_server, Some("a.b.c"));
    let mut events = session.subscribe();

    let err = service.create_movie(&sample_request()).await.unwrap_err();

    assert_matches!(err, AppError::Unauthorized(msg) if msg == "Failed to create movie");
    assert!(session.token().is_none());
    assert_eq!(events.try_recv(), Ok(SessionInvalidated));
    assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
}
