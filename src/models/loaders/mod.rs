pub mod image_loader;
pub mod toml_loader;

pub use image_loader::{load_all_sheet_images, load_sheet_image};
pub use toml_loader::{load_key_from_toml, save_key_to_toml};
