pub mod document;
pub mod selection;
pub mod settings;
pub mod tree;
