//! Config module.
//! Provides configuration types, default paths, list files, XML loading, and validation.

pub mod lists;
pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use lists::{parse_list, read_list_file};
pub use paths::{CONFIG_ENV, default_config_path, default_log_path, path_has_symlink_ancestor};
pub use types::{
    Config, ExclusionConfig, LogLevel, ROOT_SENTINEL, RunConfig, SYSTEM_RESERVED_NAMES,
    is_root_sentinel,
};
pub use validate::{resolve_root, validate_and_normalize};
pub use xml::{create_template_config, load_config_from_xml, load_config_from_xml_path};
