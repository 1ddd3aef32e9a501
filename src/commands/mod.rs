pub mod init;
pub mod users;
