//! The render shader must parse and validate before any GPU sees it.

use antimatter::shader::SHADER_SOURCE;

/// Validates WGSL code using naga.
fn validate_wgsl(code: &str) -> Result<naga::Module, String> {
    let module = naga::front::wgsl::parse_str(code)
        .map_err(|e| format!("WGSL parse error: {:?}", e))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .map_err(|e| format!("WGSL validation error: {:?}", e))?;

    Ok(module)
}

#[test]
fn test_scene_shader_validates() {
    validate_wgsl(SHADER_SOURCE).unwrap();
}

#[test]
fn test_scene_shader_entry_points() {
    let module = validate_wgsl(SHADER_SOURCE).unwrap();
    let mut names: Vec<&str> = module.entry_points.iter().map(|e| e.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["fs_line", "fs_sprite", "vs_line", "vs_sprite"]);
}
