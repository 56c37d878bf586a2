//! Extension pour intégrer le flux vidfeed dans j2vconfig
//!
//! Ce module fournit le trait `VidfeedConfigExt` qui ajoute à
//! `j2vconfig::Config` les réglages du flux : URL du serveur, chemins
//! publiés, intervalle de rafraîchissement et timeout HTTP.
//!
//! # Exemple
//!
//! ```no_run
//! use j2vconfig::get_config;
//! use j2vfeed::VidfeedConfigExt;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = get_config();
//! let client = config.build_vidfeed_client()?;
//! println!("Listing at {}", client.listing_url()?);
//! # Ok(())
//! # }
//! ```

use crate::client::{VidfeedClient, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::layout::{FeedLayout, DEFAULT_BASE_PATH, DEFAULT_LISTING_FILE, DEFAULT_MANIFEST_FILE};
use anyhow::Result;
use j2vconfig::{impl_string_config, impl_u64_config, Config};
use std::time::Duration;

/// Default interval between two listing refreshes (5 seconds)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5000;

/// Trait d'extension pour les réglages du flux dans j2vconfig
pub trait VidfeedConfigExt {
    /// URL de base du serveur (défaut : `http://localhost:8080/`)
    fn get_vidfeed_base_url(&self) -> Result<String>;
    /// Définit l'URL de base du serveur
    fn set_vidfeed_base_url(&self, url: String) -> Result<()>;

    /// Chemin de base du flux (défaut : `vidfeed`)
    fn get_vidfeed_base_path(&self) -> Result<String>;
    /// Définit le chemin de base du flux
    fn set_vidfeed_base_path(&self, path: String) -> Result<()>;

    /// Nom du fichier de liste (défaut : `streams.json`)
    fn get_vidfeed_listing_file(&self) -> Result<String>;
    /// Définit le nom du fichier de liste
    fn set_vidfeed_listing_file(&self, name: String) -> Result<()>;

    /// Nom du manifeste de chaque flux (défaut : `stream.mpd`)
    fn get_vidfeed_manifest_file(&self) -> Result<String>;
    /// Définit le nom du manifeste
    fn set_vidfeed_manifest_file(&self, name: String) -> Result<()>;

    /// Intervalle de rafraîchissement en millisecondes (défaut : 5000)
    fn get_vidfeed_poll_interval_ms(&self) -> Result<u64>;
    /// Définit l'intervalle de rafraîchissement
    fn set_vidfeed_poll_interval_ms(&self, interval_ms: u64) -> Result<()>;

    /// Timeout des requêtes HTTP en secondes (défaut : 10)
    fn get_vidfeed_request_timeout_secs(&self) -> Result<u64>;
    /// Définit le timeout des requêtes HTTP
    fn set_vidfeed_request_timeout_secs(&self, secs: u64) -> Result<()>;

    /// Layout assembled from the path settings
    fn get_vidfeed_layout(&self) -> Result<FeedLayout> {
        Ok(FeedLayout::new(
            self.get_vidfeed_base_path()?,
            self.get_vidfeed_listing_file()?,
            self.get_vidfeed_manifest_file()?,
        ))
    }

    /// Polling interval as a duration, never zero
    fn get_vidfeed_poll_interval(&self) -> Result<Duration> {
        let interval_ms = match self.get_vidfeed_poll_interval_ms()? {
            0 => DEFAULT_POLL_INTERVAL_MS,
            ms => ms,
        };
        Ok(Duration::from_millis(interval_ms))
    }

    /// Build a listing client from the configuration
    fn build_vidfeed_client(&self) -> Result<VidfeedClient> {
        let client = VidfeedClient::builder()
            .base_url(self.get_vidfeed_base_url()?)
            .layout(self.get_vidfeed_layout()?)
            .timeout(Duration::from_secs(self.get_vidfeed_request_timeout_secs()?))
            .build()?;
        Ok(client)
    }
}

impl VidfeedConfigExt for Config {
    impl_string_config!(
        get_vidfeed_base_url,
        set_vidfeed_base_url,
        &["feed", "base_url"],
        DEFAULT_BASE_URL
    );

    impl_string_config!(
        get_vidfeed_base_path,
        set_vidfeed_base_path,
        &["feed", "base_path"],
        DEFAULT_BASE_PATH
    );

    impl_string_config!(
        get_vidfeed_listing_file,
        set_vidfeed_listing_file,
        &["feed", "listing_file"],
        DEFAULT_LISTING_FILE
    );

    impl_string_config!(
        get_vidfeed_manifest_file,
        set_vidfeed_manifest_file,
        &["feed", "manifest_file"],
        DEFAULT_MANIFEST_FILE
    );

    impl_u64_config!(
        get_vidfeed_poll_interval_ms,
        set_vidfeed_poll_interval_ms,
        &["feed", "poll_interval_ms"],
        DEFAULT_POLL_INTERVAL_MS
    );

    impl_u64_config!(
        get_vidfeed_request_timeout_secs,
        set_vidfeed_request_timeout_secs,
        &["feed", "request_timeout_secs"],
        DEFAULT_REQUEST_TIMEOUT_SECS
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::defaults();
        assert_eq!(config.get_vidfeed_base_url().unwrap(), DEFAULT_BASE_URL);
        assert_eq!(config.get_vidfeed_layout().unwrap(), FeedLayout::default());
        assert_eq!(
            config.get_vidfeed_poll_interval().unwrap(),
            Duration::from_millis(5000)
        );
        assert_eq!(config.get_vidfeed_request_timeout_secs().unwrap(), 10);
    }

    #[test]
    fn test_overrides_flow_into_client() {
        let config = Config::from_yaml(
            "feed:\n  base_url: http://cams.lan:9000\n  base_path: live\n  poll_interval_ms: '2500'\n",
        )
        .unwrap();

        assert_eq!(
            config.get_vidfeed_poll_interval().unwrap(),
            Duration::from_millis(2500)
        );

        let client = config.build_vidfeed_client().unwrap();
        assert_eq!(
            client.listing_url().unwrap().as_str(),
            "http://cams.lan:9000/live/streams.json"
        );
    }

    #[test]
    fn test_zero_interval_falls_back_to_default() {
        let config = Config::defaults();
        config.set_vidfeed_poll_interval_ms(0).unwrap();
        assert_eq!(
            config.get_vidfeed_poll_interval().unwrap(),
            Duration::from_millis(DEFAULT_POLL_INTERVAL_MS)
        );
    }
}
