//! Persistence gateway to the backing store.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Without the `hydrate` feature the transport methods return an error, so
//! the pure parts — save validation, the in-flight guard, durable-URL
//! substitution — stay natively testable.
//!
//! The store is an opaque JSON-over-HTTP collaborator: it assigns ids,
//! normalizes payloads, and returns the canonical stored form, which
//! replaces the client's copy. Authentication is the host page's concern.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here retries automatically; every failure is surfaced to the
//! operator, who re-initiates the operation. A failed save never commits
//! partial client-side state beyond individually completed image uploads.

#[cfg(test)]
#[path = "net_test.rs"]
mod net_test;

use std::cell::Cell;
use std::collections::HashMap;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::product::{InitialData, Product, SideId};
use crate::session::{ValidationError, validate_for_save};

/// Why a gateway operation failed.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The product failed the save preconditions; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A template-image upload failed; the whole save was aborted.
    #[error("image upload failed for side \"{side_name}\": {message}")]
    ImageUpload { side_name: String, message: String },
    /// A save is already outstanding; the operator must wait for it.
    #[error("a save is already in progress")]
    SaveInFlight,
    /// The request could not be sent or the store answered non-success.
    #[error("transport error: {0}")]
    Transport(String),
    /// The store's response body did not match the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// A durable image reference returned by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    pub url: String,
    pub attachment_id: i64,
}

/// Which reference-entity collection an operation targets. All of them are
/// persisted by whole-collection replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Categories,
    Colors,
    Fabrics,
    PrintTypes,
}

impl CollectionKind {
    /// URL path segment for this collection.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::Colors => "colors",
            Self::Fabrics => "fabrics",
            Self::PrintTypes => "print-types",
        }
    }
}

/// Substitute durable URLs for the sides whose images just finished
/// uploading. Returns the transient URLs that were replaced so the caller
/// can revoke them.
pub fn apply_uploaded_images(
    product: &mut Product,
    uploaded: &[(SideId, UploadedImage)],
) -> Vec<String> {
    let mut replaced = Vec::new();
    for (side_id, image) in uploaded {
        if let Some(side) = product.sides.iter_mut().find(|s| s.id == *side_id) {
            if let Some(old) = side.image_url.replace(image.url.clone()) {
                replaced.push(old);
            }
        }
    }
    replaced
}

/// The gateway to the backing store.
///
/// Holds the endpoint base URL and an in-flight flag guarding against double
/// submission: a second save while one is outstanding fails fast with
/// [`GatewayError::SaveInFlight`] instead of racing the first.
pub struct Gateway {
    base: String,
    save_in_flight: Cell<bool>,
}

impl Gateway {
    /// Create a gateway rooted at `base` (e.g. `"/api/studio"`).
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { base, save_in_flight: Cell::new(false) }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base)
    }

    /// Whether a save is currently outstanding.
    #[must_use]
    pub fn save_in_flight(&self) -> bool {
        self.save_in_flight.get()
    }

    /// Run the save preconditions and claim the in-flight slot.
    ///
    /// # Errors
    ///
    /// Validation failures and an already-outstanding save are both
    /// rejected before any network traffic.
    fn begin_save(&self, product: &Product) -> Result<(), GatewayError> {
        validate_for_save(product)?;
        if self.save_in_flight.get() {
            return Err(GatewayError::SaveInFlight);
        }
        self.save_in_flight.set(true);
        Ok(())
    }

    fn finish_save(&self) {
        self.save_in_flight.set(false);
    }

    /// Fetch the full editor dataset. Called once at editor start.
    ///
    /// # Errors
    ///
    /// Fails on transport or decode problems.
    pub async fn load_initial_data(&self) -> Result<InitialData, GatewayError> {
        self.get_json("initial-data").await
    }

    /// Persist the whole product graph: upload any pending side images
    /// first (concurrently), substitute the durable URLs, then send the
    /// product. Returns the store's canonical representation.
    ///
    /// # Errors
    ///
    /// Validation failures and double submission are rejected before any
    /// network call. Any single image-upload failure aborts the save and
    /// names the affected side.
    pub async fn save_product(
        &self,
        product: &Product,
        pending_files: &HashMap<SideId, web_sys::File>,
    ) -> Result<Product, GatewayError> {
        self.begin_save(product)?;
        let result = self.save_product_inner(product, pending_files).await;
        self.finish_save();
        if let Err(err) = &result {
            log::warn!("product save failed: {err}");
        }
        result
    }

    /// Toggle a product's shop visibility. Returns the confirmed status.
    ///
    /// # Errors
    ///
    /// Fails on transport or decode problems.
    pub async fn update_product_status(
        &self,
        id: i64,
        active: bool,
    ) -> Result<bool, GatewayError> {
        #[derive(Serialize)]
        struct StatusRequest {
            active: bool,
        }
        #[derive(Deserialize)]
        struct StatusResponse {
            active: bool,
        }

        let path = format!("products/{id}/status");
        let response: StatusResponse = self.post_json(&path, &StatusRequest { active }).await?;
        Ok(response.active)
    }

    /// Replace a reference-entity collection wholesale. Returns the
    /// canonical stored rows (ids assigned, normalization applied).
    ///
    /// # Errors
    ///
    /// Fails on transport or decode problems.
    pub async fn replace_collection<T>(
        &self,
        kind: CollectionKind,
        items: &[T],
    ) -> Result<Vec<T>, GatewayError>
    where
        T: Serialize + DeserializeOwned,
    {
        let path = format!("collections/{}", kind.path());
        self.put_json(&path, &items).await
    }

    // ── Transport (hydrate) ─────────────────────────────────────

    #[cfg(feature = "hydrate")]
    async fn save_product_inner(
        &self,
        product: &Product,
        pending_files: &HashMap<SideId, web_sys::File>,
    ) -> Result<Product, GatewayError> {
        // Fan the uploads out and join; one failure aborts the whole save.
        let uploads = pending_files.iter().map(|(side_id, file)| {
            let side_name = product
                .sides
                .iter()
                .find(|s| s.id == *side_id)
                .map_or_else(|| side_id.to_string(), |s| s.name.clone());
            async move {
                match self.upload_side_image(file).await {
                    Ok(image) => Ok((*side_id, image)),
                    Err(err) => Err(GatewayError::ImageUpload {
                        side_name,
                        message: err.to_string(),
                    }),
                }
            }
        });
        let uploaded = futures::future::try_join_all(uploads).await?;

        let mut payload = product.clone();
        for old_url in apply_uploaded_images(&mut payload, &uploaded) {
            // Drop the transient object URL now that the durable one
            // supersedes it.
            if old_url.starts_with("blob:") {
                if let Err(err) = web_sys::Url::revoke_object_url(&old_url) {
                    log::warn!("failed to revoke object url {old_url}: {err:?}");
                }
            }
        }

        self.post_json("products", &payload).await
    }

    /// Upload one template image as multipart form data.
    ///
    /// # Errors
    ///
    /// Fails on transport or decode problems.
    #[cfg(feature = "hydrate")]
    pub async fn upload_side_image(
        &self,
        file: &web_sys::File,
    ) -> Result<UploadedImage, GatewayError> {
        let form = web_sys::FormData::new()
            .map_err(|e| GatewayError::Transport(format!("{e:?}")))?;
        form.append_with_blob("file", file)
            .map_err(|e| GatewayError::Transport(format!("{e:?}")))?;

        let request = gloo_net::http::Request::post(&self.url("uploads/side-image"))
            .body(form)
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        let status = response.status();
        if !(200..300).contains(&status) {
            return Err(GatewayError::Transport(format!(
                "upload failed with status {status}"
            )));
        }
        response
            .json::<UploadedImage>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }

    #[cfg(feature = "hydrate")]
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let response = gloo_net::http::Request::get(&self.url(path))
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Self::decode(response).await
    }

    #[cfg(feature = "hydrate")]
    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        let request = gloo_net::http::Request::post(&self.url(path))
            .json(body)
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Self::decode(response).await
    }

    #[cfg(feature = "hydrate")]
    async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        let request = gloo_net::http::Request::put(&self.url(path))
            .json(body)
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Self::decode(response).await
    }

    #[cfg(feature = "hydrate")]
    async fn decode<T: DeserializeOwned>(
        response: gloo_net::http::Response,
    ) -> Result<T, GatewayError> {
        let status = response.status();
        if !(200..300).contains(&status) {
            return Err(GatewayError::Transport(format!(
                "request failed with status {status}"
            )));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }

    // ── Transport (stubs outside the browser) ───────────────────

    #[cfg(not(feature = "hydrate"))]
    async fn save_product_inner(
        &self,
        _product: &Product,
        _pending_files: &HashMap<SideId, web_sys::File>,
    ) -> Result<Product, GatewayError> {
        Err(Self::unavailable())
    }

    #[cfg(not(feature = "hydrate"))]
    async fn get_json<T: DeserializeOwned>(&self, _path: &str) -> Result<T, GatewayError> {
        Err(Self::unavailable())
    }

    #[cfg(not(feature = "hydrate"))]
    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        _path: &str,
        _body: &B,
    ) -> Result<T, GatewayError> {
        Err(Self::unavailable())
    }

    #[cfg(not(feature = "hydrate"))]
    async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        _path: &str,
        _body: &B,
    ) -> Result<T, GatewayError> {
        Err(Self::unavailable())
    }

    #[cfg(not(feature = "hydrate"))]
    fn unavailable() -> GatewayError {
        GatewayError::Transport("transport requires the hydrate feature".to_owned())
    }
}
