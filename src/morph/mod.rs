mod asset;
mod submesh;

pub use asset::{CoreSubmesh, MorphChannel, MorphTargetKind};
pub use submesh::Submesh;
