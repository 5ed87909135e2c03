//! Data model types for components and their file attachments.

pub mod component;
pub mod enums;

pub use component::{
    join_tags, split_tags, Component, ComponentFile, ComponentPatch, ComponentView, FileView,
    NewComponent,
};
pub use enums::ComponentStatus;
