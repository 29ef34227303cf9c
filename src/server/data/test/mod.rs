mod member;
mod message;
mod user;
