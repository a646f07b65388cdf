//! Tests for the file source module

use super::*;
use crate::error::Error;
use crate::http::{HttpClient, HttpClientConfig};
use test_case::test_case;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn drive_client(server: &MockServer, page_size: u32) -> DriveClient {
    let http =
        HttpClient::with_config(HttpClientConfig::builder().no_rate_limit().build()).unwrap();
    DriveClient::new(http, server.uri(), page_size)
}

#[test_case("Sales.xlsx", true ; "plain workbook")]
#[test_case("Q1 Report.xlsx", true ; "name with spaces")]
#[test_case("~backup.xlsx", false ; "lock file")]
#[test_case("report~1.xlsx", false ; "tilde inside name")]
#[test_case("notes.txt", false ; "other extension")]
#[test_case("legacy.xls", false ; "old excel format")]
#[test_case("Sales.XLSX", false ; "suffix is case sensitive")]
fn test_spreadsheet_candidate(name: &str, expected: bool) {
    assert_eq!(is_spreadsheet_candidate(name, ".xlsx"), expected);
}

#[tokio::test]
async fn test_list_follows_page_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "files": [{"id": "c", "name": "notes.txt"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(query_param("q", "'folder-1' in parents and trashed = false"))
        .and(query_param("pageSize", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "nextPageToken": "page-2",
            "files": [
                {"id": "a", "name": "Best Movies.xlsx"},
                {"id": "b", "name": "Worst Movies.xlsx"}
            ]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let client = drive_client(&server, 2);
    let files = client.list_files("folder-1").await.unwrap();

    assert_eq!(
        files,
        vec![
            SourceFile::new("a", "Best Movies.xlsx"),
            SourceFile::new("b", "Worst Movies.xlsx"),
            SourceFile::new("c", "notes.txt"),
        ]
    );
}

#[tokio::test]
async fn test_list_failure_is_list_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(403).set_body_string("insufficient permissions"))
        .mount(&server)
        .await;

    let err = drive_client(&server, 100)
        .list_files("folder-1")
        .await
        .unwrap_err();

    match err {
        Error::List { folder_id, message } => {
            assert_eq!(folder_id, "folder-1");
            assert!(message.contains("403"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_download_media() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files/file-9"))
        .and(query_param("alt", "media"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK\x03\x04payload".to_vec()))
        .mount(&server)
        .await;

    let bytes = drive_client(&server, 100)
        .download(&SourceFile::new("file-9", "Sales.xlsx"))
        .await
        .unwrap();

    assert_eq!(bytes.as_ref(), b"PK\x03\x04payload");
}

#[tokio::test]
async fn test_download_failure_is_download_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = drive_client(&server, 100)
        .download(&SourceFile::new("gone", "Gone.xlsx"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Download { ref file, .. } if file == "Gone.xlsx"));
}

#[tokio::test]
async fn test_local_folder_lists_files_sorted() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("b.xlsx"), b"b").unwrap();
    std::fs::write(dir.path().join("a.xlsx"), b"a").unwrap();
    std::fs::create_dir(dir.path().join("nested")).unwrap();

    let folder_id = format!("file://{}", dir.path().display());
    let files = LocalFolder::new().list_files(&folder_id).await.unwrap();

    let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["a.xlsx", "b.xlsx"]);

    let bytes = LocalFolder::new().download(&files[1]).await.unwrap();
    assert_eq!(bytes.as_ref(), b"b");
}

#[tokio::test]
async fn test_local_folder_missing_dir() {
    let err = LocalFolder::new()
        .list_files("/nonexistent/sheet-stager")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::List { .. }));
}

#[tokio::test]
async fn test_save_download_writes_copy() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("downloads");

    let path = save_download(&target, &SourceFile::new("id", "Sales.xlsx"), b"data")
        .await
        .unwrap();

    assert_eq!(path, target.join("Sales.xlsx"));
    assert_eq!(std::fs::read(path).unwrap(), b"data");
}

#[tokio::test]
async fn test_from_settings_retries_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(503).set_body_string("backend down"))
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    std::fs::write(
        &config_path,
        serde_json::json!({
            "shared_folder_id": "folder-1",
            "motherduck_dsn": ":memory:",
            "access_token": "ya29.test",
            "drive_api_url": server.uri(),
            "http": { "max_retries": 1, "backoff": "constant", "requests_per_second": 100 }
        })
        .to_string(),
    )
    .unwrap();
    let settings = crate::config::Settings::resolve(|_: &str| None, &config_path).unwrap();

    let client = DriveClient::from_settings(&settings).unwrap();
    assert!(format!("{client:?}").contains("backoff_type: Constant"));

    let err = client.list_files("folder-1").await.unwrap_err();
    match err {
        Error::List { folder_id, message } => {
            assert_eq!(folder_id, "folder-1");
            assert!(message.contains("Max retries (1) exceeded"));
            assert!(message.contains("HTTP 503: backend down"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
