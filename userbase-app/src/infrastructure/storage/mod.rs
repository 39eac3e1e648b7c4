mod avatar_storage;

pub use avatar_storage::{AvatarStorage, StoredAvatar};
