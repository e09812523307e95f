mod init;
mod media;
mod user;

pub use init::cmd_init;
pub use media::{cmd_add_media, cmd_list_media, cmd_relate, cmd_show_media};
pub use user::cmd_create_user;
