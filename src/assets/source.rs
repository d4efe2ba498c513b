use std::{future::Future, path::PathBuf, time::Duration};

use base64::Engine as _;

use crate::{
    assets::{decode::decode_image, image::PreparedImage},
    foundation::error::{ThumbError, ThumbResult},
};

/// Something that can produce a decoded image asynchronously.
pub trait ImageSource {
    /// Short human-readable description used in logs and errors.
    fn describe(&self) -> String;

    /// Load and decode the image.
    fn load(&self) -> impl Future<Output = ThumbResult<PreparedImage>> + Send;
}

/// Encoded image bytes already in memory.
#[derive(Clone, Debug)]
pub struct BytesSource {
    bytes: Vec<u8>,
    origin_clean: bool,
}

impl BytesSource {
    /// Bytes the caller may read back freely.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            origin_clean: true,
        }
    }

    /// Bytes fetched from an origin that did not grant read access.
    pub fn cross_origin(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            origin_clean: false,
        }
    }
}

impl ImageSource for BytesSource {
    fn describe(&self) -> String {
        format!("{} in-memory bytes", self.bytes.len())
    }

    fn load(&self) -> impl Future<Output = ThumbResult<PreparedImage>> + Send {
        let bytes = self.bytes.clone();
        let origin_clean = self.origin_clean;
        async move {
            let img = decode_blocking(bytes).await?;
            Ok(if origin_clean { img } else { img.tainted() })
        }
    }
}

/// Image file on the local filesystem.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Source reading `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ImageSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> impl Future<Output = ThumbResult<PreparedImage>> + Send {
        let path = self.path.clone();
        async move {
            let bytes = tokio::fs::read(&path).await.map_err(|e| {
                ThumbError::image_load(format!("read {}: {e}", path.display()))
            })?;
            decode_blocking(bytes).await
        }
    }
}

/// `data:image/...;base64,...` URI, the shape a canvas export or a browser upload produces.
#[derive(Clone, Debug)]
pub struct DataUriSource {
    uri: String,
}

impl DataUriSource {
    /// Source decoding `uri`.
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

impl ImageSource for DataUriSource {
    fn describe(&self) -> String {
        let head: String = self.uri.chars().take(32).collect();
        format!("data uri {head}...")
    }

    fn load(&self) -> impl Future<Output = ThumbResult<PreparedImage>> + Send {
        let payload = decode_data_uri(&self.uri);
        async move { decode_blocking(payload?).await }
    }
}

/// Base64 payload of an image data URI.
pub fn decode_data_uri(uri: &str) -> ThumbResult<Vec<u8>> {
    let rest = uri
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| ThumbError::image_load("not a data uri"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| ThumbError::image_load("data uri has no payload"))?;
    if !meta.starts_with("image/") {
        return Err(ThumbError::image_load(format!(
            "data uri media type \"{meta}\" is not an image"
        )));
    }
    if !meta.ends_with(";base64") {
        return Err(ThumbError::image_load("only base64 data uris are supported"));
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| ThumbError::image_load(format!("data uri payload: {e}")))
}

/// Load the base image and the foreground cutout concurrently.
///
/// Either source failing, or not finishing within `timeout`, yields
/// [`ThumbError::ImageLoad`]; a stalled source never hangs the caller.
pub async fn load_inputs<B, C>(
    base: &B,
    cutout: &C,
    timeout: Duration,
) -> ThumbResult<(PreparedImage, PreparedImage)>
where
    B: ImageSource,
    C: ImageSource,
{
    tracing::debug!(
        base = %base.describe(),
        cutout = %cutout.describe(),
        timeout_ms = timeout.as_millis() as u64,
        "loading composite inputs"
    );
    tokio::try_join!(
        load_with_timeout(base, "base", timeout),
        load_with_timeout(cutout, "cutout", timeout),
    )
}

async fn load_with_timeout<S: ImageSource>(
    source: &S,
    role: &str,
    timeout: Duration,
) -> ThumbResult<PreparedImage> {
    let img = tokio::time::timeout(timeout, source.load())
        .await
        .map_err(|_| {
            ThumbError::image_load(format!(
                "{role} image ({}) did not load within {} ms",
                source.describe(),
                timeout.as_millis()
            ))
        })??;
    img.ensure_loaded(role)?;
    Ok(img)
}

async fn decode_blocking(bytes: Vec<u8>) -> ThumbResult<PreparedImage> {
    tokio::task::spawn_blocking(move || decode_image(&bytes))
        .await
        .map_err(|e| ThumbError::image_load(format!("decode task failed: {e}")))?
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
