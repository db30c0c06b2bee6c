//! Generation of the project's Lua configuration files.
//!
//! | File | Global | Contents |
//! |---|---|---|
//! | `config.lua` | `application` | content area size and scale mode |
//! | `build.settings` | `settings` | orientation, plugins, permissions, iOS plist |
//! | `information.lua` | `ApplicationInformation` | `[information]` plus the advert summary |
//!
//! Each file is a [`Value`] tree built by a pure function here and rendered
//! through [`lua::serialize`](crate::lua::serialize). [`write_all`] writes
//! all three.
//!
//! ## Launch image table
//!
//! `UILaunchImages` is an ordered Lua array, but [`Value::Map`] sorts its
//! keys. The rows are therefore keyed `!100`, `!101`, ... : the `!` keeps the
//! key out of the output and three digits keep the sort numeric.

use crate::catalog::{Catalog, Orientation};
use crate::config::{DisplayConfig, ProjectConfig};
use crate::lua::{self, LuaError, Value};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Lua serialization error: {0}")]
    Lua(#[from] LuaError),
}

pub const CONFIG_LUA: &str = "config.lua";
pub const BUILD_SETTINGS: &str = "build.settings";
pub const INFORMATION_LUA: &str = "information.lua";

/// Android permissions every build requests.
pub const ANDROID_PERMISSIONS: &[&str] = &[
    "android.permission.INTERNET",
    "android.permission.ACCESS_NETWORK_STATE",
];

const GOOGLE_PLAY_SERVICES: &str = "plugin.google.play.services";

/// Supported advertising networks, in the order they are reported.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Advertiser {
    Admob,
    Vungle,
    Crossinstall,
    Inmobi,
    Inneractive,
}

impl Advertiser {
    pub const ALL: [Advertiser; 5] = [
        Advertiser::Admob,
        Advertiser::Vungle,
        Advertiser::Crossinstall,
        Advertiser::Inmobi,
        Advertiser::Inneractive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Advertiser::Admob => "admob",
            Advertiser::Vungle => "vungle",
            Advertiser::Crossinstall => "crossinstall",
            Advertiser::Inmobi => "inmobi",
            Advertiser::Inneractive => "inneractive",
        }
    }

    /// `(plugin name, publisher id)` pairs this network needs.
    pub fn plugins(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Advertiser::Admob => &[(GOOGLE_PLAY_SERVICES, "com.coronalabs")],
            Advertiser::Vungle => &[
                ("CoronaProvider.ads.vungle", "com.vungle"),
                (GOOGLE_PLAY_SERVICES, "com.coronalabs"),
            ],
            Advertiser::Crossinstall => &[("CoronaProvider.ads.crossinstall", "com.crossinstall")],
            Advertiser::Inmobi => &[("CoronaProvider.ads.inmobi", "com.coronalabs")],
            Advertiser::Inneractive => &[("CoronaProvider.ads.inneractive", "com.inner-active")],
        }
    }
}

impl fmt::Display for Advertiser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configured providers, deduplicated, in reporting order.
pub fn unique_advertisers(providers: &[Advertiser]) -> Vec<Advertiser> {
    providers
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Comma-joined provider names, e.g. `"admob,vungle"`.
pub fn available_adverts(providers: &[Advertiser]) -> String {
    unique_advertisers(providers)
        .iter()
        .map(|a| a.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

// =============================================================================
// build.settings
// =============================================================================

pub fn orientation_block(orientation: Orientation) -> Value {
    let supported = match orientation {
        Orientation::Portrait => r#"{ "portrait","portraitUpsideDown" }"#,
        Orientation::Landscape => r#"{ "landscapeLeft","landscapeRight" }"#,
    };
    Value::map([
        ("default", Value::from(orientation.as_str())),
        ("supported", Value::literal(supported)),
    ])
}

/// Plugin table keyed `["<plugin>"]`. Shared plugins appear once.
pub fn advertising_plugins(providers: &[Advertiser]) -> Value {
    let mut plugins = BTreeMap::new();
    for advertiser in unique_advertisers(providers) {
        for (plugin, publisher) in advertiser.plugins() {
            plugins.insert(
                format!("[\"{plugin}\"]"),
                Value::map([("publisherId", *publisher)]),
            );
        }
    }
    Value::Map(plugins)
}

/// Apple icon file names, in catalog order.
pub fn apple_icon_files(catalog: &Catalog) -> Value {
    Value::list(
        catalog
            .query(true, true, false)
            .into_iter()
            .map(|r| r.name.as_str()),
    )
}

/// Base launch image descriptions as `(name, points width, points height)`.
const LAUNCH_IMAGE_ROWS: &[(&str, u32, u32)] = &[
    ("Default", 320, 480),
    ("Default-568h", 320, 568),
    ("Default-Portrait", 768, 1024),
    ("Default-667h", 375, 667),
    ("Default-736h", 414, 736),
];

const LAUNCH_IMAGE_ORIENTATIONS: &[&str] = &["Portrait", "LandscapeLeft", "LandscapeRight"];

/// First ordering key of the `UILaunchImages` rows.
const FIRST_ROW_KEY: u32 = 100;

/// The `UILaunchImages` plist table.
///
/// Every base row is listed for every orientation. Landscape rows of the
/// tablet and 5.5" images point at their landscape files.
pub fn launch_image_table() -> Value {
    let mut rows = BTreeMap::new();
    let mut key = FIRST_ROW_KEY;
    for &(base, width, height) in LAUNCH_IMAGE_ROWS {
        let version = if height == 667 || height == 736 { "8.0" } else { "7.0" };
        for &orientation in LAUNCH_IMAGE_ORIENTATIONS {
            let name = match (orientation, base) {
                ("Portrait", _) => base,
                (_, "Default-Portrait") => "Default-Landscape",
                (_, "Default-736h") => "Default-Landscape-736h",
                _ => base,
            };
            let row = Value::list([
                format!("[\"UILaunchImageMinimumOSVersion\"] = \"{version}\""),
                format!("[\"UILaunchImageName\"] = \"{name}\""),
                format!("[\"UILaunchImageOrientation\"] = \"{orientation}\""),
                format!("[\"UILaunchImageSize\"] = \"{{{width}, {height}}}\""),
            ]);
            rows.insert(format!("!{key}"), row);
            key += 1;
        }
    }
    Value::Map(rows)
}

/// The `settings` table of `build.settings`.
pub fn build_settings(catalog: &Catalog, providers: &[Advertiser]) -> Value {
    let permissions = Value::list(ANDROID_PERMISSIONS.iter().copied());
    let plist = Value::map([
        ("CFBundleIconFiles", apple_icon_files(catalog)),
        ("UILaunchImages", launch_image_table()),
    ]);

    Value::map([
        ("orientation", orientation_block(catalog.orientation())),
        ("plugins", advertising_plugins(providers)),
        (
            "excludeFiles",
            Value::map([("all", Value::literal("{ 'exclude/*' }"))]),
        ),
        ("android", Value::map([("usesPermissions", permissions)])),
        ("iPhone", Value::map([("plist", plist)])),
    ])
}

// =============================================================================
// config.lua and information.lua
// =============================================================================

/// The `application` table of `config.lua`.
pub fn config_lua(display: &DisplayConfig) -> Value {
    Value::map([(
        "content",
        Value::map([
            ("width", Value::from(display.width)),
            ("height", Value::from(display.height)),
            ("scale", Value::from(display.scale.as_str())),
        ]),
    )])
}

/// Ad unit id keys copied into `adverts.<provider>`.
pub const AD_UNIT_KEYS: [&str; 4] = [
    "iosbanner",
    "androidbanner",
    "iosinterstitial",
    "androidinterstitial",
];
const BANNER_KEYS: [&str; 2] = ["iosbanner", "androidbanner"];
const INTERSTITIAL_KEYS: [&str; 2] = ["iosinterstitial", "androidinterstitial"];

fn is_advertiser_key(key: &str) -> bool {
    Advertiser::ALL
        .iter()
        .any(|a| key.eq_ignore_ascii_case(a.as_str()))
}

/// Non-empty ad unit ids from `[information.<provider>]`, keys lower-cased.
///
/// The table name and its keys match in any case (`iosBanner` works).
pub fn ad_unit_ids(
    information: &toml::Table,
    advertiser: Advertiser,
) -> BTreeMap<String, String> {
    let Some(section) = information
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(advertiser.as_str()))
        .and_then(|(_, value)| value.as_table())
    else {
        return BTreeMap::new();
    };
    section
        .iter()
        .filter_map(|(key, value)| {
            let key = key.to_ascii_lowercase();
            let id = value.as_str()?.trim();
            (AD_UNIT_KEYS.contains(&key.as_str()) && !id.is_empty())
                .then(|| (key, id.to_string()))
        })
        .collect()
}

/// Configured providers that have every ad unit id the enabled ad types
/// need, deduplicated, in reporting order.
pub fn supported_advertisers(config: &ProjectConfig) -> Vec<Advertiser> {
    let adverts = &config.adverts;
    let mut required: Vec<&str> = Vec::new();
    if adverts.uses_banners {
        required.extend(BANNER_KEYS);
    }
    if adverts.uses_interstitials {
        required.extend(INTERSTITIAL_KEYS);
    }

    unique_advertisers(&adverts.providers)
        .into_iter()
        .filter(|&advertiser| {
            let ids = ad_unit_ids(&config.information, advertiser);
            let missing: Vec<&str> = required
                .iter()
                .copied()
                .filter(|key| !ids.contains_key(*key))
                .collect();
            if !missing.is_empty() {
                log::warn!(
                    "{advertiser} left out of adverts: no {} in [information.{advertiser}]",
                    missing.join(", ")
                );
            }
            missing.is_empty()
        })
        .collect()
}

/// The `ApplicationInformation` table.
///
/// Starts from `[information]` without the provider tables, then sets
/// `adverts.available` and one `adverts.<provider>` table of ad unit ids for
/// each supported provider.
pub fn information(config: &ProjectConfig) -> Result<Value, LuaError> {
    let mut table = config.information.clone();
    table.retain(|key, _| !is_advertiser_key(key));
    let mut info = match Value::from_toml(&toml::Value::Table(table))? {
        Value::Map(map) => map,
        _ => BTreeMap::new(),
    };

    let supported = supported_advertisers(config);
    let mut adverts = BTreeMap::new();
    adverts.insert(
        "available".to_string(),
        Value::from(available_adverts(&supported)),
    );
    for &advertiser in &supported {
        adverts.insert(
            advertiser.as_str().to_string(),
            Value::map(ad_unit_ids(&config.information, advertiser)),
        );
    }
    info.insert("adverts".to_string(), Value::Map(adverts));
    Ok(Value::Map(info))
}

/// Write `config.lua`, `build.settings` and `information.lua` into
/// `output_dir`, creating it if needed. Returns the written paths.
pub fn write_all(
    output_dir: &Path,
    catalog: &Catalog,
    config: &ProjectConfig,
) -> Result<Vec<PathBuf>, SettingsError> {
    std::fs::create_dir_all(output_dir)?;

    let providers = supported_advertisers(config);
    let files = [
        (CONFIG_LUA, "application", config_lua(&config.display)),
        (BUILD_SETTINGS, "settings", build_settings(catalog, &providers)),
        (INFORMATION_LUA, "ApplicationInformation", information(config)?),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (file_name, global, value) in files {
        let text = lua::serialize(global, &value)?;
        let path = output_dir.join(file_name);
        std::fs::write(&path, text)?;
        log::debug!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lua::serialize_legacy;
    use tempfile::TempDir;

    fn catalog(orientation: Orientation) -> Catalog {
        Catalog::new(orientation).unwrap()
    }

    // =========================================================================
    // Advertisers
    // =========================================================================

    #[test]
    fn available_adverts_dedupes_in_fixed_order() {
        let providers = [Advertiser::Inmobi, Advertiser::Admob, Advertiser::Inmobi];
        assert_eq!(available_adverts(&providers), "admob,inmobi");
        assert_eq!(available_adverts(&[]), "");
    }

    #[test]
    fn vungle_pulls_in_play_services() {
        let plugins = advertising_plugins(&[Advertiser::Vungle]);
        let Value::Map(map) = plugins else {
            panic!("plugins must be a map")
        };
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "[\"CoronaProvider.ads.vungle\"]",
                "[\"plugin.google.play.services\"]"
            ]
        );
    }

    #[test]
    fn plugin_entries_render() {
        let out = lua::serialize("plugins", &advertising_plugins(&[Advertiser::Inneractive]))
            .unwrap();
        assert_eq!(
            out,
            "plugins = \n{\n    [\"CoronaProvider.ads.inneractive\"] = \n    {\n        publisherId = \"com.inner-active\"\n    }\n}\n"
        );
    }

    // =========================================================================
    // build.settings pieces
    // =========================================================================

    #[test]
    fn orientation_blocks() {
        let out = lua::serialize("orientation", &orientation_block(Orientation::Landscape))
            .unwrap();
        assert_eq!(
            out,
            "orientation = \n{\n    default = \"landscape\",\n    supported = { \"landscapeLeft\",\"landscapeRight\" }\n}\n"
        );
    }

    #[test]
    fn icon_files_are_apple_only_and_sorted() {
        let Value::List(items) = apple_icon_files(&catalog(Orientation::Portrait)) else {
            panic!("icon files must be a list")
        };
        let names: Vec<String> = items
            .into_iter()
            .map(|v| match v {
                Value::Str(s) => s,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(names.len(), 17);
        assert_eq!(names.first().map(String::as_str), Some("Icon-60.png"));
        assert_eq!(names.last().map(String::as_str), Some("Icon@2x.png"));
        assert!(!names.iter().any(|n| n.contains("dpi")));
    }

    #[test]
    fn launch_table_has_fifteen_rows() {
        let Value::Map(rows) = launch_image_table() else {
            panic!("launch table must be a map")
        };
        assert_eq!(rows.len(), 15);
        assert_eq!(rows.keys().next().map(String::as_str), Some("!100"));
        assert_eq!(rows.keys().last().map(String::as_str), Some("!114"));
    }

    #[test]
    fn launch_table_renames_landscape_rows() {
        let Value::Map(rows) = launch_image_table() else {
            panic!("launch table must be a map")
        };
        // Default-Portrait is the third base row: !106 portrait, !107 landscape left
        assert_eq!(
            rows["!107"],
            Value::list([
                "[\"UILaunchImageMinimumOSVersion\"] = \"7.0\"",
                "[\"UILaunchImageName\"] = \"Default-Landscape\"",
                "[\"UILaunchImageOrientation\"] = \"LandscapeLeft\"",
                "[\"UILaunchImageSize\"] = \"{768, 1024}\"",
            ])
        );
        // Default-736h landscape right is the last row
        assert_eq!(
            rows["!114"],
            Value::list([
                "[\"UILaunchImageMinimumOSVersion\"] = \"8.0\"",
                "[\"UILaunchImageName\"] = \"Default-Landscape-736h\"",
                "[\"UILaunchImageOrientation\"] = \"LandscapeRight\"",
                "[\"UILaunchImageSize\"] = \"{414, 736}\"",
            ])
        );
    }

    #[test]
    fn launch_table_renders_anonymous_rows() {
        let text = lua::serialize("UILaunchImages", &launch_image_table()).unwrap();
        assert!(text.starts_with(
            "UILaunchImages = \n{\n    {\n        [\"UILaunchImageMinimumOSVersion\"] = \"7.0\",\n        [\"UILaunchImageName\"] = \"Default\",\n        [\"UILaunchImageOrientation\"] = \"Portrait\",\n        [\"UILaunchImageSize\"] = \"{320, 480}\"\n    },\n"
        ));
        assert!(!text.contains("!10"));
    }

    #[test]
    fn build_settings_sections_in_sorted_order() {
        let text = lua::serialize(
            "settings",
            &build_settings(&catalog(Orientation::Portrait), &[Advertiser::Admob]),
        )
        .unwrap();
        let position = |needle: &str| text.find(needle).unwrap_or_else(|| panic!("{needle}"));
        assert!(position("    android = ") < position("    excludeFiles = "));
        assert!(position("    excludeFiles = ") < position("    iPhone = "));
        assert!(position("    iPhone = ") < position("    orientation = "));
        assert!(position("    orientation = ") < position("    plugins = "));
        assert!(text.contains("        all = { 'exclude/*' }\n"));
        assert!(text.contains("            \"android.permission.INTERNET\",\n"));
        assert!(text.contains("[\"plugin.google.play.services\"] = "));
        assert!(text.ends_with("    }\n}\n"));
    }

    #[test]
    fn legacy_serializer_agrees_on_generated_trees() {
        for orientation in Orientation::ALL {
            let tree = build_settings(
                &catalog(orientation),
                &[Advertiser::Vungle, Advertiser::Inmobi],
            );
            assert_eq!(
                serialize_legacy("settings", &tree).unwrap(),
                lua::serialize("settings", &tree).unwrap()
            );
        }
        let display = config_lua(&DisplayConfig::default());
        assert_eq!(
            serialize_legacy("application", &display).unwrap(),
            lua::serialize("application", &display).unwrap()
        );
    }

    // =========================================================================
    // config.lua and information.lua
    // =========================================================================

    #[test]
    fn config_lua_text() {
        let text = lua::serialize("application", &config_lua(&DisplayConfig::default())).unwrap();
        assert_eq!(
            text,
            "application = \n{\n    content = \n    {\n        height = 960,\n        scale = \"letterbox\",\n        width = 640\n    }\n}\n"
        );
    }

    fn project(text: &str) -> ProjectConfig {
        toml::from_str(text).unwrap()
    }

    #[test]
    fn information_copies_ad_unit_ids_into_adverts() {
        let config = project(
            r#"
[adverts]
providers = ["admob"]

[information.admob]
iosbanner = "ca-app-pub-1"
"#,
        );

        let text = lua::serialize("ApplicationInformation", &information(&config).unwrap()).unwrap();
        assert_eq!(
            text,
            "ApplicationInformation = \n{\n    adverts = \n    {\n        admob = \n        {\n            iosbanner = \"ca-app-pub-1\"\n        },\n        available = \"admob\"\n    }\n}\n"
        );
    }

    #[test]
    fn information_drops_providers_missing_banner_ids() {
        let config = project(
            r#"
[adverts]
providers = ["vungle", "admob"]
uses_banners = true

[information.application]
name = "Blocks"

[information.Admob]
iosBanner = "ca-app-pub-1"
androidBanner = "ca-app-pub-2"
iosInterstitial = "ca-app-pub-3"

[information.vungle]
iosbanner = "v-1"
"#,
        );

        assert_eq!(supported_advertisers(&config), vec![Advertiser::Admob]);
        let text = lua::serialize("ApplicationInformation", &information(&config).unwrap()).unwrap();
        assert_eq!(
            text,
            "ApplicationInformation = \n{\n    adverts = \n    {\n        admob = \n        {\n            androidbanner = \"ca-app-pub-2\",\n            iosbanner = \"ca-app-pub-1\",\n            iosinterstitial = \"ca-app-pub-3\"\n        },\n        available = \"admob\"\n    },\n    application = \n    {\n        name = \"Blocks\"\n    }\n}\n"
        );
    }

    #[test]
    fn interstitials_need_both_platform_ids() {
        let config = project(
            r#"
[adverts]
providers = ["inmobi", "crossinstall"]
uses_interstitials = true

[information.inmobi]
iosinterstitial = "i-1"
androidinterstitial = "i-2"

[information.crossinstall]
iosinterstitial = "c-1"
androidinterstitial = "  "
"#,
        );

        assert_eq!(supported_advertisers(&config), vec![Advertiser::Inmobi]);
        let ids = ad_unit_ids(&config.information, Advertiser::Crossinstall);
        assert_eq!(ids.len(), 1);
        assert_eq!(ids["iosinterstitial"], "c-1");
    }

    #[test]
    fn ad_unit_ids_ignore_other_keys() {
        let config = project(
            r#"
[information.admob]
iosbanner = "a"
appid = "ca-app-pub-9"
androidbanner = 5
"#,
        );
        let ids = ad_unit_ids(&config.information, Advertiser::Admob);
        assert_eq!(ids.keys().collect::<Vec<_>>(), vec!["iosbanner"]);
        assert!(ad_unit_ids(&config.information, Advertiser::Vungle).is_empty());
    }

    #[test]
    fn legacy_serializer_agrees_on_information() {
        let config = project(
            r#"
[adverts]
providers = ["admob", "inneractive"]

[information.application]
name = "Blocks"
version = 1.5

[information.inneractive]
iosbanner = "ia-1"
"#,
        );
        let tree = information(&config).unwrap();
        assert_eq!(
            serialize_legacy("ApplicationInformation", &tree).unwrap(),
            lua::serialize("ApplicationInformation", &tree).unwrap()
        );
    }

    #[test]
    fn unsupported_providers_get_no_plugins() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("source");
        let config = project(
            r#"
[adverts]
providers = ["vungle"]
uses_banners = true
"#,
        );

        write_all(&out, &catalog(Orientation::Portrait), &config).unwrap();

        let build = std::fs::read_to_string(out.join(BUILD_SETTINGS)).unwrap();
        assert!(!build.contains("vungle"));
        let info = std::fs::read_to_string(out.join(INFORMATION_LUA)).unwrap();
        assert!(info.contains("available = \"\""));
    }

    #[test]
    fn information_rejects_booleans() {
        let config: ProjectConfig =
            toml::from_str("[information.configuration]\ndebug = true\n").unwrap();
        assert!(matches!(
            information(&config),
            Err(LuaError::InvalidStructure { .. })
        ));
    }

    #[test]
    fn write_all_creates_three_files() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("source");
        let config = ProjectConfig::default();

        let written = write_all(&out, &catalog(Orientation::Portrait), &config).unwrap();

        assert_eq!(written.len(), 3);
        let build = std::fs::read_to_string(out.join(BUILD_SETTINGS)).unwrap();
        assert!(build.starts_with("settings = \n{\n"));
        assert!(build.contains("default = \"portrait\""));
        let info = std::fs::read_to_string(out.join(INFORMATION_LUA)).unwrap();
        assert!(info.contains("available = \"\""));
        assert!(out.join(CONFIG_LUA).exists());
    }
}
