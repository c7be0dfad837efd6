//! Service-worker bindings for the offline cache policy.
//!
//! Implements the [`offline`] seams on top of the browser's `CacheStorage`
//! and `fetch`, and wires `install`, `activate` and `fetch` events to an
//! [`OfflineCache`].

use crate::error::{CacheError, Result};
use crate::offline::{self, AssetRequest, AssetResponse, OfflineCache, Route};
use async_trait::async_trait;
use js_sys::{Array, Promise};
use log::{debug, error, warn};
use std::rc::Rc;
use url::Url;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{ExtendableEvent, FetchEvent, Request, Response, ServiceWorkerGlobalScope};

/// Best-effort text of a JS rejection value.
fn js_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

async fn settle(promise: Promise) -> std::result::Result<JsValue, JsValue> {
    JsFuture::from(promise).await
}

fn storage_error(value: JsValue) -> CacheError {
    CacheError::Storage(js_message(&value))
}

impl From<CacheError> for JsValue {
    fn from(err: CacheError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

impl AssetRequest for Request {
    fn method(&self) -> String {
        Request::method(self)
    }

    fn url(&self) -> String {
        Request::url(self)
    }

    fn accept(&self) -> Option<String> {
        self.headers().get("accept").ok().flatten()
    }
}

impl AssetResponse for Response {
    fn is_ok(&self) -> bool {
        self.ok()
    }

    fn duplicate(&self) -> Result<Self> {
        Response::clone(self).map_err(|err| CacheError::InvalidResponse(js_message(&err)))
    }
}

fn optional_response(value: JsValue) -> Result<Option<Response>> {
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    value
        .dyn_into::<Response>()
        .map(Some)
        .map_err(|other| CacheError::InvalidResponse(js_message(&other)))
}

pub struct BrowserCache(web_sys::Cache);

#[async_trait(?Send)]
impl offline::Cache for BrowserCache {
    type Request = Request;
    type Response = Response;

    async fn lookup(&self, request: &Request) -> Result<Option<Response>> {
        let found = settle(self.0.match_with_request(request))
            .await
            .map_err(storage_error)?;
        optional_response(found)
    }

    async fn lookup_path(&self, path: &str) -> Result<Option<Response>> {
        let found = settle(self.0.match_with_str(path))
            .await
            .map_err(storage_error)?;
        optional_response(found)
    }

    async fn put(&self, request: &Request, response: Response) -> Result<()> {
        settle(self.0.put_with_request(request, &response))
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    async fn add(&self, path: &str) -> Result<()> {
        settle(self.0.add_with_str(path))
            .await
            .map_err(|err| CacheError::Network {
                url: path.to_string(),
                reason: js_message(&err),
            })?;
        Ok(())
    }

    async fn add_all(&self, paths: &[String]) -> Result<()> {
        let list: Array = paths.iter().map(|p| JsValue::from_str(p)).collect();
        settle(self.0.add_all_with_str_sequence(&list))
            .await
            .map_err(|err| CacheError::Network {
                url: format!("{} mandatory assets", paths.len()),
                reason: js_message(&err),
            })?;
        Ok(())
    }
}

pub struct BrowserCaches(web_sys::CacheStorage);

#[async_trait(?Send)]
impl offline::CacheStorage for BrowserCaches {
    type Cache = BrowserCache;

    async fn open(&self, name: &str) -> Result<BrowserCache> {
        let cache = settle(self.0.open(name)).await.map_err(storage_error)?;
        cache
            .dyn_into::<web_sys::Cache>()
            .map(BrowserCache)
            .map_err(storage_error)
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let keys = settle(self.0.keys()).await.map_err(storage_error)?;
        Ok(Array::from(&keys)
            .iter()
            .filter_map(|name| name.as_string())
            .collect())
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        let deleted = settle(self.0.delete(name)).await.map_err(storage_error)?;
        Ok(deleted.as_bool().unwrap_or(false))
    }
}

pub struct BrowserNetwork(ServiceWorkerGlobalScope);

#[async_trait(?Send)]
impl offline::Network for BrowserNetwork {
    type Request = Request;
    type Response = Response;

    async fn fetch(&self, request: &Request) -> Result<Response> {
        let response = settle(self.0.fetch_with_request(request))
            .await
            .map_err(|err| CacheError::Network {
                url: request.url(),
                reason: js_message(&err),
            })?;
        response
            .dyn_into::<Response>()
            .map_err(|other| CacheError::InvalidResponse(js_message(&other)))
    }
}

pub type BrowserOfflineCache = OfflineCache<BrowserCaches, BrowserNetwork>;

/// Build the policy for `scope` and attach its lifecycle and fetch listeners.
pub fn register(scope: ServiceWorkerGlobalScope) -> std::result::Result<(), JsValue> {
    let href = scope.location().href();
    let origin = Url::parse(&href)
        .map_err(|_| CacheError::InvalidOrigin(href.clone()))?
        .origin();
    let caches = scope.caches()?;
    let worker: Rc<BrowserOfflineCache> = Rc::new(OfflineCache::new(
        BrowserCaches(caches),
        BrowserNetwork(scope.clone()),
        origin,
    ));

    let on_install = {
        let worker = worker.clone();
        Closure::<dyn FnMut(ExtendableEvent)>::new(move |event: ExtendableEvent| {
            let worker = worker.clone();
            let install = future_to_promise(async move {
                let report = worker.install().await?;
                debug!("Install finished: {:?}", report);
                Ok(JsValue::UNDEFINED)
            });
            if let Err(err) = event.wait_until(&install) {
                error!("install: waitUntil rejected: {}", js_message(&err));
            }
        })
    };

    let on_activate = {
        let worker = worker.clone();
        let scope = scope.clone();
        Closure::<dyn FnMut(ExtendableEvent)>::new(move |event: ExtendableEvent| {
            let worker = worker.clone();
            let clients = scope.clients();
            let activate = future_to_promise(async move {
                worker.activate().await?;
                settle(clients.claim()).await?;
                Ok(JsValue::UNDEFINED)
            });
            if let Err(err) = event.wait_until(&activate) {
                error!("activate: waitUntil rejected: {}", js_message(&err));
            }
        })
    };

    let on_fetch = {
        let worker = worker.clone();
        Closure::<dyn FnMut(FetchEvent)>::new(move |event: FetchEvent| {
            let request = event.request();
            let route = worker.route(&request);
            if route == Route::Passthrough {
                return;
            }
            let worker = worker.clone();
            let response = future_to_promise(async move {
                let response = worker.respond(&request, route).await?;
                Ok(response.into())
            });
            if let Err(err) = event.respond_with(&response) {
                warn!("respondWith failed: {}", js_message(&err));
            }
        })
    };

    scope.add_event_listener_with_callback("install", on_install.as_ref().unchecked_ref())?;
    scope.add_event_listener_with_callback("activate", on_activate.as_ref().unchecked_ref())?;
    scope.add_event_listener_with_callback("fetch", on_fetch.as_ref().unchecked_ref())?;

    // Listeners live as long as the worker.
    on_install.forget();
    on_activate.forget();
    on_fetch.forget();
    Ok(())
}
