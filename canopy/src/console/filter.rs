// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::{HOST, HeaderName};
use actix_web::web::Data;
use actix_web::{HttpMessage, HttpRequest};
use std::future::{Ready, ready};
use std::pin::Pin;
use std::rc::Rc;

use super::{Console, ConsoleSettings};
use crate::api::ApiError;
use crate::config::ValidatedConfig;
use crate::resolve::{RequestTarget, ResolutionResult, UrlResolver};
use crate::site::SiteTreeIndex;

/// Console URL the client is looking at, e.g. `/news/2024/item-42?item=42`.
pub const CONSOLE_URL_HEADER: &str = "x-canopy-url";
pub const FORWARDED_HOST_HEADER: &str = "x-forwarded-host";
pub const POSTED_FIELD_HEADER: &str = "postedfield";
pub const SITE_HINT_HEADER: &str = "x-canopy-site";

/// Access to the resolution the console filter attached to a request.
pub trait ConsoleRequest {
    fn resolution(&self) -> Option<ResolutionResult>;
    /// Removes the console from the request so the handler owns it.
    fn take_console(&self) -> Option<Console>;
}

impl ConsoleRequest for HttpRequest {
    fn resolution(&self) -> Option<ResolutionResult> {
        self.extensions().get::<ResolutionResult>().cloned()
    }

    fn take_console(&self) -> Option<Console> {
        self.extensions_mut().remove::<Console>()
    }
}

/// Resolves the console URL of API requests before handlers run.
pub struct ConsoleFilter;

impl<S, B> Transform<S, ServiceRequest> for ConsoleFilter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ConsoleFilterMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ConsoleFilterMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct ConsoleFilterMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for ConsoleFilterMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let config = req.app_data::<Data<ValidatedConfig>>().cloned();
        let index = req.app_data::<Data<SiteTreeIndex>>().cloned();
        let service = self.service.clone();

        let prepared = match (config, index) {
            (Some(config), Some(index)) => prepare(&req, &config, &index),
            _ => {
                log::warn!("Console filter is mounted without configuration or site index");
                Ok(None)
            }
        };

        Box::pin(async move {
            match prepared {
                Ok(Some((resolution, console))) => {
                    req.extensions_mut().insert(resolution);
                    req.extensions_mut().insert(console);
                }
                Ok(None) => {}
                Err(err) => {
                    log::warn!("Rejected console request {}: {}", req.path(), err);
                    return Err(err.into());
                }
            }
            service.call(req).await
        })
    }
}

fn prepare(
    req: &ServiceRequest,
    config: &ValidatedConfig,
    index: &SiteTreeIndex,
) -> Result<Option<(ResolutionResult, Console)>, ApiError> {
    let Some(url) = header_value(req, CONSOLE_URL_HEADER)? else {
        return Ok(None);
    };

    let site_hint = match header_value(req, SITE_HINT_HEADER)? {
        Some(raw) => Some(raw.trim().parse::<u32>().map_err(|_| {
            ApiError::BadRequest(format!("{} must be a site id", SITE_HINT_HEADER))
        })?),
        None => None,
    };
    let forwarded_host = if config.security.use_forwarded_host {
        header_value(req, FORWARDED_HOST_HEADER)?
    } else {
        None
    };
    let posted_field = header_value(req, POSTED_FIELD_HEADER)?;

    let scheme = req.connection_info().scheme().to_string();
    let host = match req.headers().get(HOST).and_then(|value| value.to_str().ok()) {
        Some(host) => host.to_string(),
        None => req.app_config().host().to_string(),
    };

    let target = RequestTarget::new(&scheme, &host, &config.console.path_base)
        .with_url(&url)
        .with_forwarded_host(forwarded_host)
        .with_posted_field(posted_field.clone())
        .with_site_hint(site_hint);

    let snapshot = index.snapshot();
    let resolution = UrlResolver::new(&snapshot, &config.console.browsing_class).resolve(&target)?;
    log::debug!(
        "Console {} resolved on {}: list={:?} page={:?} item={}",
        url,
        target.effective_host(),
        resolution.list.as_ref().map(|node| node.path()),
        resolution.page.as_ref().map(|node| node.path()),
        resolution.item_id
    );

    let mut console = Console::new(ConsoleSettings::from_config(config));
    console.apply_resolution(&resolution);
    console.set_posted_field(posted_field);
    Ok(Some((resolution, console)))
}

fn header_value(req: &ServiceRequest, name: &'static str) -> Result<Option<String>, ApiError> {
    let Some(value) = req.headers().get(HeaderName::from_static(name)) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| ApiError::BadRequest(format!("{} header is not valid text", name)))?;
    Ok(Some(value.to_string()).filter(|value| !value.trim().is_empty()))
}
