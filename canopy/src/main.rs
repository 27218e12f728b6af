// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::rt::System;
use actix_web::{App, HttpServer, middleware::Logger, web};
use log::{LevelFilter, info};
use std::io::Write;
use std::sync::Arc;

use canopy::app_state::AppState;
use canopy::asset::MemoryAssetStore;
use canopy::bootstrap::{self, BootstrapResult};
use canopy::config::ValidatedConfig;
use canopy::content::MemoryContentStore;
use canopy::runtime_paths::RuntimePaths;
use canopy::site::SiteTreeIndex;
use canopy::{api, util};

const HELP_TEXT: &str = "Usage: canopy [-C <root>]\n\n  -C <root>   runtime directory holding config.yaml and state/ (default: .)\n  -h, --help  show this help\n";

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

fn run() -> i32 {
    let parsed_args = match parse_args() {
        Ok(args) => args,
        Err(error) => {
            eprintln!("❌ Invalid command line arguments: {}", error);
            eprintln!("❌ Use -C <root> to set the runtime directory.");
            return 1;
        }
    };

    if matches!(parsed_args.mode, RunMode::Help) {
        print!("{}", HELP_TEXT);
        return 0;
    }

    let bootstrap = match bootstrap::bootstrap_runtime(&parsed_args.runtime_root) {
        Ok(result) => result,
        Err(error) => {
            eprintln!("❌ Bootstrap error: {}", error);
            eprintln!("❌ Application cannot start with invalid configuration.");
            return 1;
        }
    };

    match System::new().block_on(run_server(bootstrap)) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("❌ Server failed to start: {}", error);
            1
        }
    }
}

async fn run_server(bootstrap: BootstrapResult) -> std::io::Result<()> {
    let validated_config = Arc::new(bootstrap.validated_config);
    let runtime_paths = bootstrap.runtime_paths;

    let log_level = match validated_config.logging.level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    };

    let logger = env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .target(env_logger::Target::Stdout)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f UTC"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .build();

    util::init_logger(util::default_rules(), logger).map_err(|error| {
        eprintln!("❌ Failed to initialize logger: {}", error);
        std::io::Error::other(error.to_string())
    })?;

    log_startup_info(&validated_config, &runtime_paths);

    let site_index = SiteTreeIndex::new(runtime_paths.sites_file.clone());
    if let Err(e) = site_index.rebuild().await {
        eprintln!("❌ Failed to load site definitions: {}", e);
        eprintln!("❌ Application cannot start without a site index.");
        return Err(std::io::Error::other(e.to_string()));
    }
    info!("✅ Site index initialized successfully");

    let store = match MemoryContentStore::from_seed_file(&runtime_paths.content_file).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            eprintln!("❌ Failed to load content: {}", e);
            return Err(std::io::Error::other(e.to_string()));
        }
    };
    info!("✅ Content store initialized successfully");

    let assets = Arc::new(MemoryAssetStore::new(
        validated_config.assets.base_url.clone(),
        validated_config.assets.max_upload_bytes,
    ));

    let app_state = Arc::new(AppState::new(runtime_paths, store, assets));
    let site_index = web::Data::new(site_index);
    let workers = validated_config.server.workers;
    let bind_address = (
        validated_config.server.host.clone(),
        validated_config.server.port,
    );

    let factory = {
        let config_for_app = validated_config.clone();
        move || {
            let config_for_routes = config_for_app.clone();
            App::new()
                .app_data(web::Data::from(config_for_app.clone()))
                .app_data(web::Data::from(app_state.clone()))
                .app_data(site_index.clone())
                .wrap(Logger::new(
                    r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T"#,
                ))
                .configure(move |cfg| api::configure(cfg, &config_for_routes))
        }
    };

    HttpServer::new(factory)
        .workers(workers)
        .bind(bind_address)?
        .run()
        .await
}

fn log_startup_info(config: &ValidatedConfig, runtime_paths: &RuntimePaths) {
    info!("Starting {} - {}", config.app.name, config.app.description);
    info!("Workers: {}", config.server.workers);
    info!(
        "Listening on http://{}:{}{}/{{content,asset}}",
        config.server.host,
        config.server.port,
        config.api_scope()
    );
    info!(
        "Assets served from {} (max upload {} bytes)",
        config.assets.base_url, config.assets.max_upload_bytes
    );
    info!(
        "Console culture {} (legacy {}), dates {}",
        config.console.culture, config.console.legacy_culture, config.console.date_format
    );
    info!("Runtime root: {}", runtime_paths.root.display());
    info!("Sites file: {}", runtime_paths.sites_file.display());
    info!("Content file: {}", runtime_paths.content_file.display());
}

#[derive(Debug)]
enum RunMode {
    Serve,
    Help,
}

struct ParsedArgs {
    runtime_root: std::path::PathBuf,
    mode: RunMode,
}

fn parse_args() -> Result<ParsedArgs, String> {
    parse_args_from(std::env::args().skip(1))
}

fn parse_args_from<I>(args: I) -> Result<ParsedArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();
    if args.iter().any(|arg| is_help_flag(arg)) {
        return Ok(ParsedArgs {
            runtime_root: std::path::PathBuf::from("."),
            mode: RunMode::Help,
        });
    }

    let mut args = args.into_iter();
    let mut runtime_root = std::path::PathBuf::from(".");

    while let Some(arg) = args.next() {
        if arg == "--" {
            continue;
        } else if arg == "-C" {
            let value = args
                .next()
                .ok_or_else(|| "Missing value for -C".to_string())?;
            runtime_root = std::path::PathBuf::from(value);
        } else {
            return Err(format!("Unexpected argument: {}", arg));
        }
    }

    let runtime_root = make_runtime_root_absolute(runtime_root)?;
    Ok(ParsedArgs {
        runtime_root,
        mode: RunMode::Serve,
    })
}

fn is_help_flag(arg: &str) -> bool {
    arg == "-h" || arg == "--help" || arg.eq_ignore_ascii_case("help")
}

fn make_runtime_root_absolute(
    runtime_root: std::path::PathBuf,
) -> Result<std::path::PathBuf, String> {
    if runtime_root.is_absolute() {
        return Ok(runtime_root);
    }

    let current_dir = std::env::current_dir()
        .map_err(|error| format!("Failed to resolve current directory: {}", error))?;
    Ok(current_dir.join(runtime_root))
}
