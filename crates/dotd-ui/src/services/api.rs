//! HTTP client for the DOTD backend (REST).
//!
//! # Design
//! - One client instance per app boot; the bearer token is swapped via
//!   interior mutability so callers never rebuild the client.
//! - Non-2xx responses surface the backend's `detail` message when the
//!   body carries one, otherwise the HTTP status.

use crate::core::logic::{
    build_creation_path, build_feed_path, build_like_path, build_my_creations_path,
    build_picked_path, build_pick_path, build_task_status_path,
};
use crate::features::generate::state::GenerationParams;
use crate::features::listings::mutations::LikeDirection;
use crate::features::listings::state::{CreationCard, PageRequest};
use dotd_api_models::{
    ApiError, Creation, CurrentUser, FeedSort, LoginRequest, LoginResponse, TaskCreated,
    TaskSnapshot,
};
use gloo_net::http::{Request, Response};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::FormData;

/// Context wrapper handing the one [`ApiClient`] built at boot to the
/// component tree. Equality is pointer identity, so providing the same
/// client never re-renders consumers.
#[derive(Clone)]
pub(crate) struct ApiCtx {
    /// The process-wide client; login/logout swap its token in place.
    pub client: Rc<ApiClient>,
}

impl ApiCtx {
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Rc::new(ApiClient::new(base_url)),
        }
    }
}

impl PartialEq for ApiCtx {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.client, &other.client)
    }
}

#[derive(Debug)]
pub(crate) struct ApiClient {
    pub base_url: String,
    token: RefCell<Option<String>>,
}

impl ApiClient {
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: RefCell::new(None),
        }
    }

    /// Swap the bearer token used on subsequent requests.
    pub(crate) fn set_token(&self, token: Option<String>) {
        *self.token.borrow_mut() = token;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    fn authorize(&self, req: Request) -> Request {
        match self.token.borrow().as_deref() {
            Some(token) => req.header("Authorization", &format!("Bearer {token}")),
            None => req,
        }
    }

    async fn error_from(resp: Response) -> anyhow::Error {
        let status = resp.status();
        match resp.json::<ApiError>().await {
            Ok(err) => anyhow::anyhow!(err.detail),
            Err(_) => anyhow::anyhow!("http {status}"),
        }
    }

    async fn get_json<T: for<'de> serde::Deserialize<'de>>(&self, path: &str) -> anyhow::Result<T> {
        let resp = self.authorize(Request::get(&self.url(path))).send().await?;
        if !resp.ok() {
            return Err(Self::error_from(resp).await);
        }
        Ok(resp.json::<T>().await?)
    }

    async fn send_empty(&self, req: Request) -> anyhow::Result<()> {
        let resp = req.send().await?;
        if !resp.ok() {
            return Err(Self::error_from(resp).await);
        }
        Ok(())
    }

    /// Exchange credentials for an access token.
    pub(crate) async fn login(&self, email: &str, password: &str) -> anyhow::Result<String> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp = Request::post(&self.url("/auth/login"))
            .json(&body)?
            .send()
            .await?;
        if !resp.ok() {
            return Err(Self::error_from(resp).await);
        }
        let token = resp.json::<LoginResponse>().await?.access_token;
        self.set_token(Some(token.clone()));
        Ok(token)
    }

    /// Resolve the identity behind the stored token.
    ///
    /// `Ok(None)` means the token was rejected (expired or revoked);
    /// transport failures come back as errors so callers can decide
    /// whether to keep the credential.
    pub(crate) async fn fetch_me(&self) -> anyhow::Result<Option<CurrentUser>> {
        let resp = self
            .authorize(Request::get(&self.url("/users/me")))
            .send()
            .await?;
        if resp.status() == 401 || resp.status() == 403 {
            return Ok(None);
        }
        if !resp.ok() {
            return Err(Self::error_from(resp).await);
        }
        Ok(Some(resp.json::<CurrentUser>().await?))
    }

    pub(crate) async fn fetch_feed_page(
        &self,
        sort: FeedSort,
        request: &PageRequest,
    ) -> anyhow::Result<Vec<CreationCard>> {
        let path = build_feed_path(sort, request.limit, request.offset);
        let data: Vec<Creation> = self.get_json(&path).await?;
        Ok(data.into_iter().map(CreationCard::from).collect())
    }

    pub(crate) async fn fetch_my_page(
        &self,
        request: &PageRequest,
    ) -> anyhow::Result<Vec<CreationCard>> {
        let path = build_my_creations_path(request.limit, request.offset);
        let data: Vec<Creation> = self.get_json(&path).await?;
        Ok(data.into_iter().map(CreationCard::from).collect())
    }

    pub(crate) async fn fetch_picked(&self, limit: usize) -> anyhow::Result<Vec<CreationCard>> {
        let data: Vec<Creation> = self.get_json(&build_picked_path(limit)).await?;
        Ok(data.into_iter().map(CreationCard::from).collect())
    }

    /// Issue the like or unlike call matching an optimistic toggle.
    pub(crate) async fn set_like(
        &self,
        creation_id: &str,
        direction: LikeDirection,
    ) -> anyhow::Result<()> {
        let url = self.url(&build_like_path(creation_id));
        let req = match direction {
            LikeDirection::Like => Request::post(&url),
            LikeDirection::Unlike => Request::delete(&url),
        };
        self.send_empty(self.authorize(req)).await
    }

    /// Toggle the admin pick flag on a creation.
    pub(crate) async fn toggle_pick(&self, creation_id: &str) -> anyhow::Result<()> {
        let req = Request::post(&self.url(&build_pick_path(creation_id)));
        self.send_empty(self.authorize(req)).await
    }

    /// Delete a creation as its owner or an admin.
    pub(crate) async fn delete_creation(&self, creation_id: &str) -> anyhow::Result<()> {
        let req = Request::delete(&self.url(&build_creation_path(creation_id)));
        self.send_empty(self.authorize(req)).await
    }

    /// Submit a photo plus parameters and return the accepted task id.
    pub(crate) async fn submit_generation(
        &self,
        file: &web_sys::File,
        params: &GenerationParams,
    ) -> anyhow::Result<String> {
        let form = FormData::new().map_err(|_| anyhow::anyhow!("form-data unavailable"))?;
        form.append_with_blob_and_filename("file", file, &file.name())
            .map_err(|err| anyhow::anyhow!("attach file: {err:?}"))?;
        let _ = form.append_with_str("gender", &params.gender);
        let _ = form.append_with_str("age_group", &params.age_group);
        let _ = form.append_with_str("style", &params.style);
        let _ = form.append_with_str("colors", &params.colors.join(","));
        let _ = form.append_with_str("prompt", &params.prompt);
        let _ = form.append_with_str("is_public", if params.is_public { "true" } else { "false" });
        let req = self
            .authorize(Request::post(&self.url("/api/create_task")))
            .body(form);
        let resp = req.send().await?;
        if !resp.ok() {
            return Err(Self::error_from(resp).await);
        }
        Ok(resp.json::<TaskCreated>().await?.task_id)
    }

    /// Fetch the current status snapshot for a generation task.
    pub(crate) async fn task_status(&self, task_id: &str) -> anyhow::Result<TaskSnapshot> {
        self.get_json(&build_task_status_path(task_id)).await
    }
}
