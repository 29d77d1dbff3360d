use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use crate::error::AppError;

/// Canonical identifier for a streaming subscription service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceId {
    Netflix,
    Hulu,
    Disney,
    Max,
    Peacock,
    Discovery,
    Tubi,
    Pluto,
    Youtube,
    Prime,
    Plex,
    Paramount,
    Apple,
    Amc,
    Shudder,
    Crunchyroll,
    Starz,
}

impl ServiceId {
    pub const ALL: [ServiceId; 17] = [
        ServiceId::Netflix,
        ServiceId::Hulu,
        ServiceId::Disney,
        ServiceId::Max,
        ServiceId::Peacock,
        ServiceId::Discovery,
        ServiceId::Tubi,
        ServiceId::Pluto,
        ServiceId::Youtube,
        ServiceId::Prime,
        ServiceId::Plex,
        ServiceId::Paramount,
        ServiceId::Apple,
        ServiceId::Amc,
        ServiceId::Shudder,
        ServiceId::Crunchyroll,
        ServiceId::Starz,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceId::Netflix => "netflix",
            ServiceId::Hulu => "hulu",
            ServiceId::Disney => "disney",
            ServiceId::Max => "max",
            ServiceId::Peacock => "peacock",
            ServiceId::Discovery => "discovery",
            ServiceId::Tubi => "tubi",
            ServiceId::Pluto => "pluto",
            ServiceId::Youtube => "youtube",
            ServiceId::Prime => "prime",
            ServiceId::Plex => "plex",
            ServiceId::Paramount => "paramount",
            ServiceId::Apple => "apple",
            ServiceId::Amc => "amc",
            ServiceId::Shudder => "shudder",
            ServiceId::Crunchyroll => "crunchyroll",
            ServiceId::Starz => "starz",
        }
    }
}

impl Display for ServiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| AppError::UnknownService(s.to_string()))
    }
}

/// How to launch and navigate one service's app on the TV device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub display_name: String,
    /// Android package name, used by the generic launch-by-package fallback
    pub package: String,
    /// Fully-qualified `package/activity` component, when verified on the device
    #[serde(default)]
    pub component: Option<String>,
    /// Profile picker entries, left to right
    #[serde(default)]
    pub profiles: Vec<String>,
}

impl ServiceDescriptor {
    fn new(display_name: &str, package: &str, component: Option<&str>, profiles: &[&str]) -> Self {
        Self {
            display_name: display_name.to_string(),
            package: package.to_string(),
            component: component.map(str::to_string),
            profiles: profiles.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Profile selection only happens when there is more than one profile to choose from
    pub fn has_profile_picker(&self) -> bool {
        self.profiles.len() > 1
    }

    /// Name of the profile at `index`, or an empty string when out of range
    pub fn profile_name(&self, index: usize) -> &str {
        self.profiles.get(index).map(String::as_str).unwrap_or("")
    }
}

/// Immutable table of service descriptors, loaded once at startup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceCatalog {
    descriptors: BTreeMap<ServiceId, ServiceDescriptor>,
}

impl ServiceCatalog {
    pub fn new(descriptors: impl IntoIterator<Item = (ServiceId, ServiceDescriptor)>) -> Self {
        Self {
            descriptors: descriptors.into_iter().collect(),
        }
    }

    /// Descriptors for the apps installed on the household Fire TV.
    /// Components were verified via `dumpsys` on the device.
    pub fn builtin() -> Self {
        use ServiceId::*;
        Self::new([
            (
                Netflix,
                ServiceDescriptor::new(
                    "Netflix",
                    "com.netflix.ninja",
                    Some("com.netflix.ninja/.MainActivity"),
                    &["Justin", "justinuras", "Vicki", "Tony", "Kristen"],
                ),
            ),
            (
                Hulu,
                ServiceDescriptor::new(
                    "Hulu",
                    "com.hulu.plus",
                    Some("com.hulu.plus/.SplashActivity"),
                    &[],
                ),
            ),
            (
                Disney,
                ServiceDescriptor::new(
                    "Disney+",
                    "com.disney.disneyplus",
                    Some("com.disney.disneyplus/com.bamtechmedia.dominguez.main.MainActivity"),
                    &["Justin", "Vicki", "Tony", "Kristen"],
                ),
            ),
            (
                Max,
                ServiceDescriptor::new(
                    "Max",
                    "com.hbo.hbonow",
                    Some("com.hbo.hbonow/com.wbd.beam.BeamActivity"),
                    &[],
                ),
            ),
            (
                Peacock,
                ServiceDescriptor::new(
                    "Peacock",
                    "com.peacock.peacockfiretv",
                    Some("com.peacock.peacockfiretv/com.peacock.peacocktv.AmazonMainActivity"),
                    &["Justin", "Tony", "Kids Profile"],
                ),
            ),
            (
                Discovery,
                ServiceDescriptor::new(
                    "Discovery+",
                    "com.discovery.discoveryplus.firetv",
                    Some("com.discovery.discoveryplus.firetv/com.wbd.beam.BeamActivity"),
                    &["Justin", "Kristen"],
                ),
            ),
            (Tubi, ServiceDescriptor::new("Tubi", "com.tubitv.ott", None, &[])),
            (Pluto, ServiceDescriptor::new("Pluto TV", "tv.pluto.android", None, &[])),
            (
                Youtube,
                ServiceDescriptor::new("YouTube", "com.amazon.firetv.youtube", None, &[]),
            ),
            (
                Prime,
                ServiceDescriptor::new("Prime Video", "com.amazon.avod.thirdpartyclient", None, &[]),
            ),
            (Plex, ServiceDescriptor::new("Plex", "com.plexapp.android", None, &[])),
            (Paramount, ServiceDescriptor::new("Paramount+", "com.cbs.ott", None, &[])),
            (
                Apple,
                ServiceDescriptor::new("Apple TV+", "com.apple.atve.amazon.appletv", None, &[]),
            ),
            (Amc, ServiceDescriptor::new("AMC+", "com.amcplus.firetv", None, &[])),
            (Shudder, ServiceDescriptor::new("Shudder", "com.amc.shudder", None, &[])),
            (
                Crunchyroll,
                ServiceDescriptor::new("Crunchyroll", "com.crunchyroll.crunchyroid", None, &[]),
            ),
            (
                Starz,
                ServiceDescriptor::new("Starz", "com.bydeluxe.d3.android.program.starz", None, &[]),
            ),
        ])
    }

    pub fn get(&self, id: ServiceId) -> Option<&ServiceDescriptor> {
        self.descriptors.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ServiceId, &ServiceDescriptor)> {
        self.descriptors.iter()
    }

    /// Display names keyed by service id, for the frontend
    pub fn display_names(&self) -> BTreeMap<ServiceId, String> {
        self.iter()
            .map(|(id, d)| (*id, d.display_name.clone()))
            .collect()
    }

    /// Profile lists for services that offer a profile picker
    pub fn profiles(&self) -> BTreeMap<ServiceId, Vec<String>> {
        self.iter()
            .filter(|(_, d)| !d.profiles.is_empty())
            .map(|(id, d)| (*id, d.profiles.clone()))
            .collect()
    }
}
