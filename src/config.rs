use glam::Vec3;

const MODEL_PATH_ENV: &str = "PORTFOLIO_MODEL";

#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 2.0, 8.0),
            target: Vec3::ZERO,
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LightingConfig {
    pub ambient_intensity: f32,
    pub directional_position: Vec3,
    pub directional_intensity: f32,
    pub color: Vec3,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_intensity: 0.6,
            directional_position: Vec3::new(5.0, 5.0, 5.0),
            directional_intensity: 1.2,
            color: Vec3::ONE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StarfieldConfig {
    pub radius: f32,
    pub depth: f32,
    pub count: usize,
    pub factor: f32,
    pub saturation: f32,
    pub fade: bool,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            radius: 200.0,
            depth: 60.0,
            count: 5000,
            factor: 4.0,
            saturation: 0.0,
            fade: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FloatConfig {
    pub speed: f32,
    pub rotation_intensity: f32,
    pub float_intensity: f32,
    pub floating_range: [f32; 2],
}

impl Default for FloatConfig {
    fn default() -> Self {
        Self {
            speed: 1.5,
            rotation_intensity: 2.0,
            float_intensity: 1.0,
            floating_range: [-0.1, 0.1],
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub path: String,
    pub scale: f32,
    pub position: Vec3,
    pub fade_in: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: std::env::var(MODEL_PATH_ENV)
                .unwrap_or_else(|_| "assets/astronaut_fixed.glb".to_string()),
            scale: 1.5,
            position: Vec3::new(0.0, -4.0, 0.0),
            fade_in: 0.5,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub lighting: LightingConfig,
    pub starfield: StarfieldConfig,
    pub float: FloatConfig,
    pub model: ModelConfig,
}
