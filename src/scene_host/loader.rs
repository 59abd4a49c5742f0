use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use tokio::sync::oneshot::{self, error::TryRecvError};

/// A decoded glTF file: document, binary buffers and images.
pub struct LoadedAsset {
    pub document: gltf::Document,
    pub buffers: Vec<gltf::buffer::Data>,
    pub images: Vec<gltf::image::Data>,
}

impl LoadedAsset {
    pub fn import(path: &Path) -> anyhow::Result<Self> {
        let start = Instant::now();
        let (document, buffers, images) = gltf::import(path)
            .with_context(|| format!("Failed to import model {}", path.display()))?;

        log::info!(
            "Imported {} in {:.1?} ({} meshes, {} animations, {} images)",
            path.display(),
            start.elapsed(),
            document.meshes().len(),
            document.animations().len(),
            images.len()
        );

        Ok(Self {
            document,
            buffers,
            images,
        })
    }
}

/// A model import running on the blocking pool.
pub struct PendingAsset {
    path: PathBuf,
    receiver: oneshot::Receiver<anyhow::Result<LoadedAsset>>,
}

impl PendingAsset {
    pub fn spawn(runtime: &tokio::runtime::Handle, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (sender, receiver) = oneshot::channel();

        log::info!("Loading model {}", path.display());
        let task_path = path.clone();
        runtime.spawn_blocking(move || {
            let _ = sender.send(LoadedAsset::import(&task_path));
        });

        Self { path, receiver }
    }

    /// Wraps an existing receiver; the sender side decides when loading ends.
    pub fn from_receiver(
        path: impl Into<PathBuf>,
        receiver: oneshot::Receiver<anyhow::Result<LoadedAsset>>,
    ) -> Self {
        Self {
            path: path.into(),
            receiver,
        }
    }

    /// Returns the import result once it is available.
    pub fn poll(&mut self) -> Option<anyhow::Result<LoadedAsset>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(anyhow::anyhow!(
                "Loader for {} stopped without a result",
                self.path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reports_an_error() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .build()
            .unwrap();
        let mut pending = PendingAsset::spawn(runtime.handle(), "assets/does_not_exist.glb");

        let result = loop {
            if let Some(result) = pending.poll() {
                break result;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        };

        let error = result.err().unwrap();
        assert!(format!("{:#}", error).contains("does_not_exist.glb"));
    }

    #[test]
    fn dropped_sender_is_an_error() {
        let (sender, receiver) = oneshot::channel();
        let mut pending = PendingAsset::from_receiver("model.glb", receiver);

        assert!(pending.poll().is_none());
        drop(sender);
        assert!(pending.poll().unwrap().is_err());
    }
}
