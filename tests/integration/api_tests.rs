//! API integration tests
//!
//! Run against a live server with a migrated database:
//! `cargo test -- --ignored`

use reqwest::{
    multipart::{Form, Part},
    Client,
};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

const JPEG_MAGIC: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];

fn jpeg_bytes(len: usize) -> Vec<u8> {
    let mut data = vec![0u8; len.max(JPEG_MAGIC.len())];
    data[..JPEG_MAGIC.len()].copy_from_slice(&JPEG_MAGIC);
    data
}

fn image_part(data: Vec<u8>) -> Part {
    Part::bytes(data)
        .file_name("cover.jpg")
        .mime_str("image/jpeg")
        .expect("Invalid mime")
}

/// Create an author and return its id
async fn create_author(client: &Client, firstname: &str, lastname: &str) -> String {
    let response = client
        .post(format!("{}/authors", BASE_URL))
        .json(&json!({
            "firstname": firstname,
            "lastname": lastname
        }))
        .send()
        .await
        .expect("Failed to send create author request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse author response");
    body["id"].as_str().expect("No id in response").to_string()
}

/// Create a book with the given author ids and return the response body
async fn create_book(client: &Client, title: &str, authors: &[String]) -> Value {
    let data = json!({
        "title": title,
        "description": "Integration test book",
        "authors": authors
    });

    let form = Form::new()
        .text("data", data.to_string())
        .part("image", image_part(jpeg_bytes(1024)));

    let response = client
        .post(format!("{}/books", BASE_URL))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send create book request");

    assert_eq!(response.status(), 201);

    response.json().await.expect("Failed to parse book response")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_create_and_get_book() {
    let client = Client::new();

    let author_id = create_author(&client, "Dante", "Alighieri").await;
    let book = create_book(&client, "The Divine Comedy", &[author_id.clone()]).await;

    assert_eq!(book["title"], "The Divine Comedy");
    assert_eq!(book["authors"].as_array().unwrap().len(), 1);
    assert_eq!(book["authors"][0]["id"], Value::String(author_id));

    // Image path has the <6-hex>/<file> shape
    let image = book["image"].as_str().unwrap();
    let (dir, file) = image.split_once('/').unwrap();
    assert_eq!(dir.len(), 6);
    assert!(file.ends_with(".jpg"));

    let response = client
        .get(format!("{}/books/{}", BASE_URL, book["id"].as_str().unwrap()))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let fetched: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(fetched["title"], "The Divine Comedy");
}

#[tokio::test]
#[ignore]
async fn test_create_book_without_authors_is_rejected() {
    let client = Client::new();

    let data = json!({
        "title": "Orphan Book",
        "authors": []
    });

    let form = Form::new()
        .text("data", data.to_string())
        .part("image", image_part(jpeg_bytes(1024)));

    let response = client
        .post(format!("{}/books", BASE_URL))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("at least one author"));
}

#[tokio::test]
#[ignore]
async fn test_create_book_with_unknown_author_names_the_id() {
    let client = Client::new();

    let missing_id = "00000000-0000-4000-8000-000000000000";
    let data = json!({
        "title": "Ghost Written",
        "authors": [missing_id]
    });

    let form = Form::new()
        .text("data", data.to_string())
        .part("image", image_part(jpeg_bytes(1024)));

    let response = client
        .post(format!("{}/books", BASE_URL))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["message"].as_str().unwrap().contains(missing_id));
}

#[tokio::test]
#[ignore]
async fn test_create_book_with_missing_parts_is_rejected() {
    let client = Client::new();

    // No image part at all
    let form = Form::new().text("data", json!({"title": "T", "authors": []}).to_string());

    let response = client
        .post(format!("{}/books", BASE_URL))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_create_book_with_disallowed_image_type_is_rejected() {
    let client = Client::new();

    let author_id = create_author(&client, "Taras", "Shevchenko").await;
    let data = json!({
        "title": "Kobzar",
        "authors": [author_id]
    });

    let gif = Part::bytes(b"GIF89a-not-an-image".to_vec())
        .file_name("cover.gif")
        .mime_str("image/gif")
        .unwrap();

    let form = Form::new().text("data", data.to_string()).part("image", gif);

    let response = client
        .post(format!("{}/books", BASE_URL))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_update_title_leaves_authors_and_image_untouched() {
    let client = Client::new();

    let author_id = create_author(&client, "Lesya", "Ukrainka").await;
    let book = create_book(&client, "Old Title", &[author_id.clone()]).await;
    let book_id = book["id"].as_str().unwrap();
    let old_image = book["image"].as_str().unwrap();

    let form = Form::new().text("data", json!({"title": "New Title"}).to_string());

    let response = client
        .post(format!("{}/books/update/{}", BASE_URL, book_id))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    let updated: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(updated["title"], "New Title");
    assert_eq!(updated["image"], old_image);
    assert_eq!(updated["authors"].as_array().unwrap().len(), 1);
    assert_eq!(updated["authors"][0]["id"], Value::String(author_id));
}

#[tokio::test]
#[ignore]
async fn test_update_authors_applies_set_difference() {
    let client = Client::new();

    let kept = create_author(&client, "Ivan", "Franko").await;
    let removed = create_author(&client, "Panas", "Myrnyi").await;
    let added = create_author(&client, "Olha", "Kobylianska").await;

    let book = create_book(&client, "Anthology", &[kept.clone(), removed]).await;
    let book_id = book["id"].as_str().unwrap();

    let form = Form::new().text(
        "data",
        json!({"authors": [kept.clone(), added.clone()]}).to_string(),
    );

    let response = client
        .post(format!("{}/books/update/{}", BASE_URL, book_id))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    let updated: Value = response.json().await.expect("Failed to parse response");
    let mut result: Vec<String> = updated["authors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap().to_string())
        .collect();
    result.sort();

    let mut expected = vec![kept, added];
    expected.sort();

    assert_eq!(result, expected);
}

#[tokio::test]
#[ignore]
async fn test_update_with_empty_author_list_is_rejected() {
    let client = Client::new();

    let author_id = create_author(&client, "Hryhorii", "Skovoroda").await;
    let book = create_book(&client, "Fables", &[author_id]).await;
    let book_id = book["id"].as_str().unwrap();

    let form = Form::new().text("data", json!({"authors": []}).to_string());

    let response = client
        .post(format!("{}/books/update/{}", BASE_URL, book_id))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_replace_image_switches_path() {
    let client = Client::new();

    let author_id = create_author(&client, "Mykhailo", "Kotsiubynsky").await;
    let book = create_book(&client, "Fata Morgana", &[author_id]).await;
    let book_id = book["id"].as_str().unwrap();
    let old_image = book["image"].as_str().unwrap().to_string();

    let form = Form::new()
        .text("data", json!({}).to_string())
        .part("image", image_part(jpeg_bytes(2048)));

    let response = client
        .post(format!("{}/books/update/{}", BASE_URL, book_id))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    let updated: Value = response.json().await.expect("Failed to parse response");
    let new_image = updated["image"].as_str().unwrap();
    assert_ne!(new_image, old_image);

    // New image is served, the old one is gone
    let ok = client
        .get(format!("http://localhost:8080/images/{}", new_image))
        .send()
        .await
        .expect("Failed to fetch new image");
    assert!(ok.status().is_success());

    let gone = client
        .get(format!("http://localhost:8080/images/{}", old_image))
        .send()
        .await
        .expect("Failed to fetch old image");
    assert_eq!(gone.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_list_books_filtered_by_author_lastname() {
    let client = Client::new();

    let author_id = create_author(&client, "Valerian", "Pidmohylny").await;
    create_book(&client, "The City", &[author_id]).await;

    let response = client
        .get(format!("{}/books?authors_lastname=pidmoh", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let items = body["items"].as_array().unwrap();
    assert!(!items.is_empty());
    for item in items {
        let lastnames: Vec<&str> = item["authors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["lastname"].as_str().unwrap())
            .collect();
        assert!(lastnames.iter().any(|l| l.to_lowercase().contains("pidmoh")));
    }
}

#[tokio::test]
#[ignore]
async fn test_get_author_includes_books() {
    let client = Client::new();

    let author_id = create_author(&client, "Yurii", "Yanovsky").await;
    create_book(&client, "The Horsemen", &[author_id.clone()]).await;

    let response = client
        .get(format!("{}/authors/{}", BASE_URL, author_id))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let books = body["books"].as_array().unwrap();
    assert!(books.iter().any(|b| b["title"] == "The Horsemen"));
}

#[tokio::test]
#[ignore]
async fn test_create_author_with_short_lastname_is_rejected() {
    let client = Client::new();

    let response = client
        .post(format!("{}/authors", BASE_URL))
        .json(&json!({
            "firstname": "Ab",
            "lastname": "Cd"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}
