// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod common;

use actix_web::http::StatusCode;
use actix_web::http::header::{CACHE_CONTROL, HOST};
use actix_web::test;
use canopy::console::filter::{CONSOLE_URL_HEADER, FORWARDED_HOST_HEADER};
use serde_json::{Value, json};

#[actix_web::test]
async fn list_item_url_renders_the_item_in_edit_mode() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = common::get_content("/news/2024/item-42", json!({ "currentSiteID": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(CACHE_CONTROL).unwrap(),
        "no-cache, no-store, must-revalidate"
    );

    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["statusCode"], 200);
    assert_eq!(json["isEditMode"], true);
    let list = &json["list"];
    assert_eq!(list["listId"], 10);
    assert_eq!(list["itemId"], 42);
    assert_eq!(list["title"], "News items");

    let fields = list["fields"].as_array().expect("fields array");
    assert_eq!(fields.len(), 3);
    assert_eq!(fields[0]["title"], "Headline*");
    assert_eq!(fields[1]["value"], "14-03-2019");
    assert_eq!(fields[1]["propertyType"], "DateTime?");
    assert_eq!(fields[2]["propertyType"], "CustomData");
    assert!(list["html"].as_str().unwrap().contains("value=\"Budget approved\""));
    assert!(json.get("page").is_none());
    assert!(json.get("explorer").is_none());
}

#[actix_web::test]
async fn unknown_path_falls_back_to_the_folder_explorer() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = common::get_content("/unknown/x", json!({ "currentSiteID": 1 })).to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(json["isEditMode"], false);
    let explorer = &json["explorer"];
    assert_eq!(explorer["siteId"], 1);
    assert!(explorer["location"].is_null());
    let paths: Vec<&str> = explorer["items"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|item| item["path"].as_str())
        .collect();
    assert_eq!(paths, vec!["/about", "/browse", "/media", "/news"]);
}

#[actix_web::test]
async fn folders_and_browsing_lists_open_the_explorer() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = common::get_content("/news/archive", json!({ "currentSiteID": 1 })).to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(json["explorer"]["location"]["path"], "/news/archive");
    assert_eq!(json["explorer"]["location"]["type"], "folder");
    assert_eq!(json["explorer"]["siteName"], "Main");
    assert_eq!(json["explorer"]["trail"][0]["path"], "/news");

    let req = common::get_content("/browse", json!({ "currentSiteID": 1 })).to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;
    assert!(json.get("list").is_none());
    assert_eq!(json["explorer"]["location"]["type"], "list");
}

#[actix_web::test]
async fn page_url_returns_the_page() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = common::get_content("/About", json!({ "currentSiteID": 1 })).to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(json["page"]["id"], 12);
    assert_eq!(json["page"]["title"], "About us");
}

#[actix_web::test]
async fn forwarded_host_selects_the_other_site() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = test::TestRequest::get()
        .uri("/mkapi/content/getcontent")
        .insert_header((HOST, common::MAIN_HOST))
        .insert_header((FORWARDED_HOST_HEADER, common::SHOP_HOST))
        .insert_header((CONSOLE_URL_HEADER, "/products"))
        .set_json(json!({ "currentSiteID": 1 }))
        .to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;
    let list = &json["list"];
    assert_eq!(list["listId"], 20);
    assert_eq!(list["itemId"], 0);
    assert_eq!(list["fields"].as_array().unwrap().len(), 0);
    assert_eq!(json["isEditMode"], false);
}

#[actix_web::test]
async fn missing_item_is_not_found() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = common::get_content("/news/7", json!({ "currentSiteID": 1 })).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["statusCode"], 404);
}

#[actix_web::test]
async fn malformed_requests_are_rejected() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = common::get_content("/news", json!({ "currentSiteID": 0 })).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["statusCode"], 400);
    assert_eq!(json["error"], "currentSiteID is required");

    let req = common::get_content("/news", json!({})).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = common::post_content("/news/42", json!({ "currentSiteID": 1, "postedField": " " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/mkapi/content/getcontent")
        .insert_header((HOST, common::MAIN_HOST))
        .set_json(json!({ "currentSiteID": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/mkapi/content/getcontent")
        .insert_header((HOST, common::MAIN_HOST))
        .insert_header((CONSOLE_URL_HEADER, "/news"))
        .insert_header(("content-type", "application/json"))
        .set_payload("{ not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn saving_a_valid_item_persists_it() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = common::post_content(
        "/news/42",
        json!({
            "currentSiteID": 1,
            "postedField": "save",
            "formValues": {
                "headline": "Budget revised",
                "publish": "15-03-2019",
                "price": "3.75"
            }
        }),
    )
    .to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(json["list"]["saved"], true);
    assert_eq!(json["list"]["isValid"], true);

    let req = common::get_content("/news/42", json!({ "currentSiteID": 1 })).to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;
    let fields = json["list"]["fields"].as_array().unwrap();
    assert_eq!(fields[0]["value"], "Budget revised");
    assert_eq!(fields[1]["value"], "15-03-2019");
    assert_eq!(fields[2]["value"], "3.75");
}

#[actix_web::test]
async fn invalid_submission_is_not_saved() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = common::post_content(
        "/news/42",
        json!({
            "currentSiteID": 1,
            "postedField": "save",
            "formValues": { "headline": "Budget revised", "publish": "not a date" }
        }),
    )
    .to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(json["list"]["saved"], false);
    assert_eq!(json["list"]["isValid"], false);
    assert!(json["list"]["html"].as_str().unwrap().contains("error"));

    let req = common::get_content("/news/42", json!({ "currentSiteID": 1 })).to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(json["list"]["fields"][0]["value"], "Budget approved");
}

#[actix_web::test]
async fn postback_without_save_rerenders_submitted_values() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(&harness)).await;

    let req = common::post_content(
        "/news",
        json!({
            "currentSiteID": 1,
            "postedField": "publish",
            "formValues": { "publish": "01-02-2020" }
        }),
    )
    .to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(json["isEditMode"], true);
    assert_eq!(json["list"]["saved"], false);
    assert_eq!(json["list"]["isValid"], true);
    assert_eq!(json["list"]["fields"][1]["value"], "01-02-2020");
}
