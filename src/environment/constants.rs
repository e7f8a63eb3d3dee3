/// Fragment shader sampling the active cubemap along the view direction
pub const ENVIRONMENT_SHADER_PATH: &str = "shaders/environment_cubemap.wgsl";

/// Default radius of the dome the environment is drawn on
pub const ENVIRONMENT_DOME_RADIUS: f32 = 500.0;
