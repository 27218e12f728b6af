// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod common;

use actix_web::http::StatusCode;
use actix_web::http::header::CACHE_CONTROL;
use actix_web::test;
use canopy::util::TestConfigBuilder;
use serde_json::{Value, json};

// "canopy" in base64
const LOGO: &str = "Y2Fub3B5";

#[actix_web::test]
async fn galleries_are_listed_from_every_site() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let resp = test::call_service(&app, common::get_galleries().to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(CACHE_CONTROL).unwrap(),
        "no-cache, no-store, must-revalidate"
    );
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(
        json,
        json!([
            { "text": "/catalogue", "value": "21", "isEnabled": true },
            { "text": "/media", "value": "14", "isEnabled": true },
            { "text": "/media/logos", "value": "15", "isEnabled": true }
        ])
    );
}

#[actix_web::test]
async fn new_asset_is_stored_and_then_updated() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = common::save_asset(json!({
        "galleryID": 15,
        "data": { "fileName": "logo.png", "contentType": "image/png", "content": LOGO }
    }))
    .to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(json["id"], 1);
    assert_eq!(json["galleryID"], 15);
    assert_eq!(json["title"], "logo.png");
    assert_eq!(json["remoteLocation"], "/assets/1.png");
    assert!(json["remoteLocationThumb"].is_null());

    let req = common::save_asset(json!({
        "id": 1,
        "title": "Company logo",
        "description": "Used in the header"
    }))
    .to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(json["title"], "Company logo");
    assert_eq!(json["description"], "Used in the header");
    assert_eq!(json["galleryID"], 15);
    assert_eq!(json["remoteLocation"], "/assets/1.png");
}

#[actix_web::test]
async fn invalid_asset_saves_are_rejected() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let cases = [
        json!({ "galleryID": 15, "data": { "fileName": "logo", "content": LOGO } }),
        json!({ "galleryID": 15 }),
        json!({ "data": { "fileName": "logo.png", "content": LOGO } }),
        json!({ "galleryID": 15, "data": { "fileName": "logo.png", "content": "" } }),
    ];
    for body in cases {
        let resp = test::call_service(&app, common::save_asset(body.clone()).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", body);
        let json: Value = test::read_body_json(resp).await;
        assert_eq!(json["statusCode"], 400);
    }

    let resp = test::call_service(
        &app,
        common::save_asset(json!({ "id": 99, "title": "Ghost" })).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn uploads_over_the_configured_limit_are_rejected() {
    let harness =
        common::TestHarness::with_config(TestConfigBuilder::new().with_max_upload_bytes(4)).await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = common::save_asset(json!({
        "galleryID": 15,
        "data": { "fileName": "logo.png", "content": LOGO }
    }))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json: Value = test::read_body_json(resp).await;
    assert!(json["error"].as_str().unwrap().contains("limit"));
}
