use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Sonarr base URL, e.g. `http://sonarr:8989`
    #[serde(default)]
    pub sonarr_url: String,

    /// Sonarr API key
    #[serde(default)]
    pub sonarr_key: String,

    /// TMDB API key
    #[serde(default)]
    pub tmdb_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_url")]
    pub tmdb_url: String,

    /// Region used when reading TMDB watch providers
    #[serde(default = "default_watch_region")]
    pub watch_region: String,

    /// Home Assistant base URL
    #[serde(default = "default_ha_url")]
    pub ha_url: String,

    /// Home Assistant long-lived access token
    #[serde(default)]
    pub ha_token: String,

    /// Home Assistant entity for the Fire TV
    #[serde(default = "default_firetv_entity")]
    pub firetv_entity: String,

    /// Home Assistant entity for the Sonos speaker
    #[serde(default = "default_sonos_entity")]
    pub sonos_entity: String,

    #[serde(default = "default_speech_enhancement_entity")]
    pub speech_enhancement_entity: String,

    #[serde(default = "default_night_mode_entity")]
    pub night_mode_entity: String,

    /// Location of the JSON document holding watched/service/progress records
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Directory served under `/static`
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// Home Assistant ingress prefix, reported to the frontend
    #[serde(default)]
    pub ingress_path: String,

    /// Optional JSON file replacing the built-in service catalog and alias table
    #[serde(default)]
    pub catalog_file: Option<PathBuf>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_watch_region() -> String {
    "US".to_string()
}

fn default_ha_url() -> String {
    "http://homeassistant:8123".to_string()
}

fn default_firetv_entity() -> String {
    "media_player.fire_tv_192_168_7_211".to_string()
}

fn default_sonos_entity() -> String {
    "media_player.living_room".to_string()
}

fn default_speech_enhancement_entity() -> String {
    "switch.living_room_speech_enhancement".to_string()
}

fn default_night_mode_entity() -> String {
    "switch.living_room_night_sound".to_string()
}

fn default_data_file() -> PathBuf {
    PathBuf::from("/data/tvguide.json")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("/app/static")
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8099
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sonarr_url: String::new(),
            sonarr_key: String::new(),
            tmdb_key: String::new(),
            tmdb_url: default_tmdb_url(),
            watch_region: default_watch_region(),
            ha_url: default_ha_url(),
            ha_token: String::new(),
            firetv_entity: default_firetv_entity(),
            sonos_entity: default_sonos_entity(),
            speech_enhancement_entity: default_speech_enhancement_entity(),
            night_mode_entity: default_night_mode_entity(),
            data_file: default_data_file(),
            static_dir: default_static_dir(),
            ingress_path: String::new(),
            catalog_file: None,
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        Ok(config.normalized())
    }

    /// Trims trailing slashes so URLs can be joined with `format!("{}/path")`
    fn normalized(mut self) -> Self {
        for url in [
            &mut self.sonarr_url,
            &mut self.tmdb_url,
            &mut self.ha_url,
            &mut self.ingress_path,
        ] {
            let trimmed = url.trim_end_matches('/').len();
            url.truncate(trimmed);
        }
        self
    }

    pub fn sonarr_configured(&self) -> bool {
        !self.sonarr_url.is_empty() && !self.sonarr_key.is_empty()
    }

    pub fn tmdb_configured(&self) -> bool {
        !self.tmdb_key.is_empty()
    }

    pub fn ha_configured(&self) -> bool {
        !self.ha_token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Config {
        let vars = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()));
        envy::from_iter::<_, Config>(vars).unwrap().normalized()
    }

    #[test]
    fn test_defaults_apply_when_unset() {
        let config = from_pairs(&[]);
        assert_eq!(config.tmdb_url, "https://api.themoviedb.org/3");
        assert_eq!(config.watch_region, "US");
        assert_eq!(config.port, 8099);
        assert_eq!(config.data_file, PathBuf::from("/data/tvguide.json"));
        assert!(config.catalog_file.is_none());
        assert!(!config.sonarr_configured());
        assert!(!config.tmdb_configured());
        assert_eq!(config.firetv_entity, Config::default().firetv_entity);
    }

    #[test]
    fn test_trailing_slashes_trimmed() {
        let config = from_pairs(&[
            ("SONARR_URL", "http://sonarr:8989/"),
            ("HA_URL", "http://ha:8123//"),
            ("INGRESS_PATH", "/api/hassio_ingress/abc/"),
        ]);
        assert_eq!(config.sonarr_url, "http://sonarr:8989");
        assert_eq!(config.ha_url, "http://ha:8123");
        assert_eq!(config.ingress_path, "/api/hassio_ingress/abc");
    }

    #[test]
    fn test_configured_flags() {
        let config = from_pairs(&[
            ("SONARR_URL", "http://sonarr:8989"),
            ("SONARR_KEY", "abc"),
            ("TMDB_KEY", "def"),
            ("HA_TOKEN", "ghi"),
        ]);
        assert!(config.sonarr_configured());
        assert!(config.tmdb_configured());
        assert!(config.ha_configured());
    }
}
