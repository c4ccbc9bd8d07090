use std::path::PathBuf;

use formcue_domain as domain;
use log::{debug, warn};

/// Treats every asset as available.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAllAssets;

impl domain::AssetValidator for AcceptAllAssets {
    async fn asset_exists(&self, _: &domain::AssetRef) -> bool {
        true
    }
}

/// Checks local assets relative to a root directory. Remote assets cannot be checked
/// and are assumed to exist.
#[derive(Debug, Clone)]
pub struct LocalAssets {
    root: PathBuf,
}

impl LocalAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl domain::AssetValidator for LocalAssets {
    async fn asset_exists(&self, asset: &domain::AssetRef) -> bool {
        if asset.is_placeholder() {
            return true;
        }
        if asset.is_remote() {
            debug!("not validating remote asset {asset}");
            return true;
        }

        let path = self.root.join(asset.as_str());
        match tokio::fs::try_exists(&path).await {
            Ok(exists) => exists,
            Err(err) => {
                warn!("failed to check asset {}: {err}", path.display());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use formcue_domain::{AssetRef, AssetValidator};

    use super::*;

    #[tokio::test]
    async fn test_accept_all_assets() {
        assert!(AcceptAllAssets.asset_exists(&"missing.gif".into()).await);
    }

    #[tokio::test]
    async fn test_local_assets() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("exercises")).unwrap();
        std::fs::write(dir.path().join("exercises/plank.gif"), b"GIF89a").unwrap();

        let assets = LocalAssets::new(dir.path());

        assert!(assets.asset_exists(&"exercises/plank.gif".into()).await);
        assert!(!assets.asset_exists(&"exercises/squat.gif".into()).await);
        assert!(assets.asset_exists(&AssetRef::placeholder()).await);
        assert!(
            assets
                .asset_exists(&"https://cdn.example.com/squat.gif".into())
                .await
        );
    }
}
