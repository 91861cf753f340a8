// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use filtercam::app::FilterKind;
use filtercam::config::Config;

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(
        config.mirror_preview, true,
        "Mirror preview should be enabled by default"
    );
    assert_eq!(
        config.last_filter,
        FilterKind::Original,
        "First run should start with no filter"
    );
}

#[test]
fn test_config_round_trips_through_serde() {
    let config = Config {
        last_filter: FilterKind::GlassSphere,
        mirror_preview: false,
        ..Config::default()
    };

    let encoded = ron::to_string(&config).expect("Config should serialize");
    let decoded: Config = ron::from_str(&encoded).expect("Config should deserialize");

    assert_eq!(decoded, config);
}
