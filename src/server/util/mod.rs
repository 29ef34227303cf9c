pub mod client_ip;
pub mod password;
pub mod token;
pub mod validate;
