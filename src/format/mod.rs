/// Card image format and storage layout

/// Geometry, limits and layout constants
pub mod constants;
/// Folder names and card image paths
pub mod path;
/// Empty card template
pub mod template;

pub use path::{boot_card_path, card_dir, card_path, legacy_boot_card_path, FolderName};
pub use template::{gen_sector, template_sector, EMPTY_CARD_TEMPLATE};
