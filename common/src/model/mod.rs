pub mod collection;
pub mod field_path;
pub mod mapping;
pub mod placeholder;
pub mod template;
pub mod template_type;
