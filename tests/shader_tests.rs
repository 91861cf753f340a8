// SPDX-License-Identifier: GPL-3.0-only

//! Validation of the preview shader with naga

const PREVIEW_SHADER: &str = include_str!("../src/app/video_shader.wgsl");

/// Validate that a WGSL shader compiles successfully using naga
fn validate_shader(name: &str, source: &str) -> naga::Module {
    match naga::front::wgsl::parse_str(source) {
        Ok(module) => {
            let info = naga::valid::Validator::new(
                naga::valid::ValidationFlags::all(),
                naga::valid::Capabilities::all(),
            )
            .validate(&module);

            if let Err(e) = info {
                panic!("Shader '{}' validation failed: {:?}", name, e);
            }
            module
        }
        Err(e) => {
            panic!("Shader '{}' parse failed: {:?}", name, e);
        }
    }
}

#[test]
fn test_preview_shader_validates() {
    validate_shader("video_shader", PREVIEW_SHADER);
}

#[test]
fn test_preview_shader_entry_points() {
    let module = validate_shader("video_shader", PREVIEW_SHADER);

    let names: Vec<&str> = module
        .entry_points
        .iter()
        .map(|ep| ep.name.as_str())
        .collect();
    assert!(names.contains(&"vs_main"), "Missing vertex entry point");
    assert!(names.contains(&"fs_main"), "Missing fragment entry point");
}

#[test]
fn test_preview_shader_covers_all_filter_modes() {
    // Every shader mode the filter enum can produce must be matched by a
    // switch case in the shader.
    for filter in filtercam::app::FilterKind::ALL {
        let mode = filter.shader_mode();
        if mode == 0 {
            // Mode 0 falls through to the default arm
            continue;
        }
        let case = format!("case {}u:", mode);
        assert!(
            PREVIEW_SHADER.contains(&case),
            "Shader has no case for filter mode {}",
            mode
        );
    }
}
