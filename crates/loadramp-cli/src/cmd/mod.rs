pub mod heights;
pub mod init;
pub mod mutate;
pub mod run;
pub mod validate;
