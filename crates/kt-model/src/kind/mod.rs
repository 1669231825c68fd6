mod resource;
pub use resource::ResourceKind;
