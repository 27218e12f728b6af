// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::HOST;
use actix_web::{App, test, web};
use canopy::api;
use canopy::app_state::AppState;
use canopy::asset::MemoryAssetStore;
use canopy::config::ValidatedConfig;
use canopy::console::filter::CONSOLE_URL_HEADER;
use canopy::content::MemoryContentStore;
use canopy::runtime_paths::RuntimePaths;
use canopy::site::SiteTreeIndex;
use canopy::util::TestConfigBuilder;
use canopy::util::test_fixtures::TestFixtureRoot;
use std::sync::Arc;

pub const MAIN_HOST: &str = "www.example.com";
pub const SHOP_HOST: &str = "shop.example.com";

pub const SITES_YAML: &str = r#"
default_site: 1
sites:
  - id: 1
    name: "Main"
    hosts: ["www.example.com"]
    nodes:
      - { id: 10, path: "/news", type: list, class: "Canopy.News", title: "News" }
      - { id: 11, path: "/news/archive", type: folder, title: "Archive" }
      - { id: 12, path: "/about", type: page, title: "About us" }
      - { id: 13, path: "/browse", type: list, class: "Canopy.AppCentre.Browsing", title: "Browse" }
      - { id: 14, path: "/media", type: gallery, title: "Media" }
      - { id: 15, path: "/media/logos", type: gallery, title: "Logos" }
  - id: 2
    name: "Shop"
    hosts: ["shop.example.com"]
    nodes:
      - { id: 20, path: "/products", type: list, class: "Canopy.Products", title: "Products" }
      - { id: 21, path: "/catalogue", type: gallery, title: "Catalogue" }
lists:
  Canopy.News:
    title: "News items"
    fields:
      - { id: headline, title: "Headline", content_type: text, mandatory: true }
      - { id: publish, title: "Publish on", content_type: date, mandatory: true, expression: left }
      - { id: price, title: "Price", content_type: number, expression: right, bag: data }
"#;

pub const CONTENT_YAML: &str = r#"
records:
  - list: 10
    item: 42
    properties:
      headline: "Budget approved"
      publish: { date: "2019-03-14T00:00:00" }
      data:
        price: "12.5"
"#;

pub struct TestHarness {
    pub fixture: TestFixtureRoot,
    pub config: Arc<ValidatedConfig>,
    pub runtime_paths: RuntimePaths,
    pub app_state: Arc<AppState>,
    pub site_index: web::Data<SiteTreeIndex>,
}

impl TestHarness {
    pub async fn new() -> Self {
        Self::with_config(TestConfigBuilder::new()).await
    }

    pub async fn with_config(builder: TestConfigBuilder) -> Self {
        let fixture = TestFixtureRoot::new_unique("content-api").expect("fixture root");
        fixture.write_sites(SITES_YAML).expect("write sites");
        fixture.write_content(CONTENT_YAML).expect("write content");
        let runtime_paths = fixture.runtime_paths().expect("runtime paths");

        let site_index = SiteTreeIndex::new(runtime_paths.sites_file.clone());
        site_index.rebuild().await.expect("site index");
        let store = MemoryContentStore::from_seed_file(&runtime_paths.content_file)
            .await
            .expect("content store");

        let config = builder.build();
        let assets = MemoryAssetStore::new(
            config.assets.base_url.clone(),
            config.assets.max_upload_bytes,
        );

        Self {
            app_state: Arc::new(AppState::new(
                runtime_paths.clone(),
                Arc::new(store),
                Arc::new(assets),
            )),
            config: Arc::new(config),
            site_index: web::Data::new(site_index),
            runtime_paths,
            fixture,
        }
    }
}

pub fn build_test_app(
    harness: &TestHarness,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let config = harness.config.clone();
    App::new()
        .app_data(web::Data::from(harness.config.clone()))
        .app_data(web::Data::from(harness.app_state.clone()))
        .app_data(harness.site_index.clone())
        .configure(move |cfg| api::configure(cfg, &config))
}

pub fn get_content(console_url: &str, body: serde_json::Value) -> test::TestRequest {
    test::TestRequest::get()
        .uri("/mkapi/content/getcontent")
        .insert_header((HOST, MAIN_HOST))
        .insert_header((CONSOLE_URL_HEADER, console_url))
        .set_json(body)
}

pub fn post_content(console_url: &str, body: serde_json::Value) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/mkapi/content/postcontent")
        .insert_header((HOST, MAIN_HOST))
        .insert_header((CONSOLE_URL_HEADER, console_url))
        .set_json(body)
}

pub fn get_galleries() -> test::TestRequest {
    test::TestRequest::get()
        .uri("/mkapi/asset/getgalleries")
        .insert_header((HOST, MAIN_HOST))
}

pub fn save_asset(body: serde_json::Value) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/mkapi/asset/saveasset")
        .insert_header((HOST, MAIN_HOST))
        .set_json(body)
}
