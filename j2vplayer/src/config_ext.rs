//! Extension pour les réglages du lecteur dans j2vconfig

use anyhow::Result;
use j2vconfig::{impl_string_config, Config};
use serde_yaml::Value;

/// Default id of the view element the engine attaches to
pub const DEFAULT_MOUNT_POINT: &str = "video_player";

/// Default for the headless engine simulation
pub const DEFAULT_SIMULATE: bool = true;

/// Trait d'extension pour les réglages du lecteur
pub trait PlayerConfigExt {
    /// Id de l'élément de la vue qui accueille le lecteur (défaut : `video_player`)
    fn get_player_mount_point(&self) -> Result<String>;
    fn set_player_mount_point(&self, mount_point: String) -> Result<()>;

    /// Le moteur headless simule-t-il les signaux de lecture ? (défaut : oui)
    fn get_player_simulate(&self) -> Result<bool>;
    fn set_player_simulate(&self, simulate: bool) -> Result<()>;
}

impl PlayerConfigExt for Config {
    impl_string_config!(
        get_player_mount_point,
        set_player_mount_point,
        &["player", "mount_point"],
        DEFAULT_MOUNT_POINT
    );

    fn get_player_simulate(&self) -> Result<bool> {
        match self.get_value(&["player", "simulate"]) {
            Ok(Value::Bool(b)) => Ok(b),
            _ => Ok(DEFAULT_SIMULATE),
        }
    }

    fn set_player_simulate(&self, simulate: bool) -> Result<()> {
        self.set_value(&["player", "simulate"], Value::Bool(simulate))
    }
}
