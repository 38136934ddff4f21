// RPC API integration tests
use actix_web::{http::StatusCode, test, web, App};
use tempfile::TempDir;

use photo_shelf::app_state::AppState;
use photo_shelf::config::AppConfig;
use photo_shelf::rpc::{
    self,
    message::{decode, encode, Empty, IdMessage, PhotoMessage, RpcResponse, RpcStatus},
};
use photo_shelf::storage::config::{StorageBackend, StorageConfig};

fn boltdb_state(dir: &TempDir) -> AppState {
    let mut config = AppConfig::default();
    config.storage = StorageConfig::new(StorageBackend::BoltDb, dir.path());
    AppState::from_config(config).unwrap()
}

fn request(method: &str, body: Vec<u8>) -> test::TestRequest {
    test::TestRequest::post()
        .uri(&format!("/rpc/PhotoService/{}", method))
        .insert_header(("content-type", "application/octet-stream"))
        .set_payload(body)
}

/// Test Save, Find and Delete through the RPC envelope
#[actix_web::test]
async fn test_rpc_save_find_delete() {
    let dir = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(boltdb_state(&dir)))
            .configure(rpc::configure),
    )
    .await;

    let save = PhotoMessage { id: None, image: b"hello".to_vec() };
    let body = test::call_and_read_body(&app, request("Save", encode(&save).unwrap()).to_request()).await;
    let response: RpcResponse<IdMessage> = decode(&body).unwrap();
    let id = response.into_result().unwrap();
    assert_eq!(id.value.len(), 32);

    let body = test::call_and_read_body(&app, request("Find", encode(&id).unwrap()).to_request()).await;
    let found: RpcResponse<PhotoMessage> = decode(&body).unwrap();
    let photo = found.into_result().unwrap();
    assert_eq!(photo.image, b"hello".to_vec());
    assert_eq!(photo.id, Some(id.clone()));

    let body = test::call_and_read_body(&app, request("Delete", encode(&id).unwrap()).to_request()).await;
    let deleted: RpcResponse<Empty> = decode(&body).unwrap();
    assert_eq!(deleted.status, RpcStatus::Ok);

    let body = test::call_and_read_body(&app, request("Find", encode(&id).unwrap()).to_request()).await;
    let missing: RpcResponse<PhotoMessage> = decode(&body).unwrap();
    assert_eq!(missing.status, RpcStatus::NotFound);
    assert!(missing.body.is_none());

    // deleting again is a no-op on the B-tree engine
    let body = test::call_and_read_body(&app, request("Delete", encode(&id).unwrap()).to_request()).await;
    let again: RpcResponse<Empty> = decode(&body).unwrap();
    assert_eq!(again.status, RpcStatus::Ok);
}

/// Test Save with an explicit id echoes it back and overwrites
#[actix_web::test]
async fn test_rpc_save_with_id() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(AppState::new_for_testing()))
            .configure(rpc::configure),
    )
    .await;

    let id = IdMessage { value: "given".to_string() };
    for image in [b"one".to_vec(), b"two".to_vec()] {
        let save = PhotoMessage { id: Some(id.clone()), image };
        let body = test::call_and_read_body(&app, request("Save", encode(&save).unwrap()).to_request()).await;
        let response: RpcResponse<IdMessage> = decode(&body).unwrap();
        assert_eq!(response.into_result().unwrap(), id);
    }

    let body = test::call_and_read_body(&app, request("Find", encode(&id).unwrap()).to_request()).await;
    let found: RpcResponse<PhotoMessage> = decode(&body).unwrap();
    assert_eq!(found.into_result().unwrap().image, b"two".to_vec());
}

/// Test malformed requests, invalid ids and unknown methods
#[actix_web::test]
async fn test_rpc_error_statuses() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(AppState::new_for_testing()))
            .configure(rpc::configure),
    )
    .await;

    let resp = test::call_service(&app, request("Save", vec![0xFF, 0xFF]).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let response: RpcResponse<IdMessage> = decode(&body).unwrap();
    assert_eq!(response.status, RpcStatus::InvalidArgument);

    let empty_id = IdMessage { value: String::new() };
    let body = test::call_and_read_body(&app, request("Find", encode(&empty_id).unwrap()).to_request()).await;
    let response: RpcResponse<PhotoMessage> = decode(&body).unwrap();
    assert_eq!(response.status, RpcStatus::InvalidArgument);

    let body = test::call_and_read_body(&app, request("Rename", Vec::new()).to_request()).await;
    let response: RpcResponse<Empty> = decode(&body).unwrap();
    assert_eq!(response.status, RpcStatus::Unimplemented);
}
