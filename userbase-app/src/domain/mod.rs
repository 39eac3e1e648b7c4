mod avatar;
mod user;

pub use avatar::{avatar_file_name, avatar_path, image_url, AVATAR_PATH_PREFIX, UPLOADS_ROUTE};
pub use user::{
    DeleteResult, EmailCheck, NewUser, User, UserFields, UserListItem, UserPatch, UserProfile,
};
