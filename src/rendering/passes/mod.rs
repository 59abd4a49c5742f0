pub mod model_pass;
pub mod starfield_pass;
