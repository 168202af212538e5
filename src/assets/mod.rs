//! Asset loading: progress tracking, pending loads and glTF decoding.
//!
//! Loads never block the render thread. Native builds read files on a
//! background thread; browser builds fetch over HTTP from a spawned future.
//! Either way the result arrives through a [`PendingLoad`] that the render
//! loop polls once per frame.

mod model;
mod pending;
mod tracker;

use std::fmt;

pub use model::{parse_model, MeshVertex, ModelAsset, ModelMesh};
pub use pending::{load_channel, LoadSender, PendingLoad};
pub use tracker::{LoadEvent, LoadTracker};

/// Why an asset failed to load.
#[derive(Debug)]
pub enum LoadError {
    /// Reading the asset from disk failed.
    Io {
        /// Path that was read.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },
    /// Fetching the asset over HTTP failed.
    Fetch(String),
    /// The bytes are not a valid glTF / GLB document.
    Parse(String),
    /// The document requires an extension this loader cannot decode.
    UnsupportedExtension(String),
    /// The document contains no triangle geometry.
    MissingGeometry,
    /// The loader went away without producing a result.
    Disconnected,
    /// The background loader could not be started.
    Spawn(std::io::Error),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to read {path}: {source}"),
            Self::Fetch(msg) => write!(f, "fetch failed: {msg}"),
            Self::Parse(msg) => write!(f, "invalid glTF: {msg}"),
            Self::UnsupportedExtension(ext) => {
                write!(f, "unsupported required extension {ext}")
            }
            Self::MissingGeometry => write!(f, "model contains no triangle meshes"),
            Self::Disconnected => write!(f, "loader stopped before finishing"),
            Self::Spawn(e) => write!(f, "failed to start loader: {e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Spawn(e) => Some(e),
            _ => None,
        }
    }
}

/// Start loading a binary glTF model from `source`.
///
/// `source` is a file path natively and a URL in the browser. Progress is
/// reported to the caller's [`LoadTracker`] when the returned handle
/// resolves.
pub fn load_model(source: &str) -> PendingLoad<ModelAsset> {
    let (sender, pending) = load_channel(source);
    spawn_model_load(source.to_owned(), sender);
    pending
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn_model_load(path: String, sender: LoadSender<ModelAsset>) {
    let spawned = std::thread::Builder::new()
        .name("model-loader".into())
        .spawn({
            let sender = sender.clone();
            move || {
                log::info!("loading model from {path}");
                let result = std::fs::read(&path)
                    .map_err(|source| LoadError::Io {
                        path: path.clone(),
                        source,
                    })
                    .and_then(|bytes| parse_model(&bytes));
                sender.send(result);
            }
        });
    if let Err(e) = spawned {
        sender.send(Err(LoadError::Spawn(e)));
    }
}

#[cfg(all(target_arch = "wasm32", feature = "web"))]
fn spawn_model_load(url: String, sender: LoadSender<ModelAsset>) {
    wasm_bindgen_futures::spawn_local(async move {
        log::info!("fetching model from {url}");
        let result = fetch_bytes(&url).await.and_then(|bytes| parse_model(&bytes));
        sender.send(result);
    });
}

#[cfg(all(target_arch = "wasm32", not(feature = "web")))]
fn spawn_model_load(url: String, sender: LoadSender<ModelAsset>) {
    sender.send(Err(LoadError::Fetch(format!(
        "{url}: browser loading requires the `web` feature"
    ))));
}

#[cfg(all(target_arch = "wasm32", feature = "web"))]
async fn fetch_bytes(url: &str) -> Result<Vec<u8>, LoadError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let js_err = |e: wasm_bindgen::JsValue| LoadError::Fetch(format!("{url}: {e:?}"));
    let window = web_sys::window()
        .ok_or_else(|| LoadError::Fetch("window not available".to_owned()))?;
    let response: web_sys::Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;
    if !response.ok() {
        return Err(LoadError::Fetch(format!("{url}: HTTP {}", response.status())));
    }
    let buffer = JsFuture::from(response.array_buffer().map_err(js_err)?)
        .await
        .map_err(js_err)?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    fn wait<T>(mut pending: PendingLoad<T>) -> Result<T, LoadError> {
        loop {
            if let Some(result) = pending.poll() {
                return result;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
    }

    #[test]
    fn missing_file_reports_io_error() {
        let result = wait(load_model("definitely/not/here.glb"));
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn garbage_file_reports_parse_error() {
        let path = std::env::temp_dir().join("lightway-garbage.glb");
        std::fs::write(&path, b"not a gltf file").unwrap();
        let result = wait(load_model(&path.to_string_lossy()));
        assert!(matches!(result, Err(LoadError::Parse(_))));
        let _ = std::fs::remove_file(path);
    }
}
