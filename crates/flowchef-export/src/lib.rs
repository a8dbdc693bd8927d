//! flowchef-export
//!
//! Portable recipe files: a self-contained HTML page per recipe with the
//! recipe JSON embedded for re-import, and zip archives of those pages.

pub mod archive;
pub mod error;
pub mod html;
pub mod parse;
pub mod render;
pub mod styles;

pub use archive::{archive_filename, export_archive, generate_export_filename, read_archive};
pub use html::{RECIPE_DATA_ID, generate_recipe_html, strip_conversation_images};
pub use parse::{decode_recipe_html, parse_recipe_from_html};
