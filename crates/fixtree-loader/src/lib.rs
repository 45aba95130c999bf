pub mod config;
pub mod files;
pub mod models;
pub mod render;
pub mod templates;

pub use config::{load_config, load_config_from_path, load_config_or_default};
pub use files::{collect_yaml_files, read_yaml_file, write_record_set, write_yaml_file};
pub use models::{load_models, load_models_from_dir};
pub use render::{render, render_with_record};
pub use templates::load_template;
