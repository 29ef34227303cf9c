pub use super::admin::Entity as Admin;
pub use super::member::Entity as Member;
pub use super::membership_notification::Entity as MembershipNotification;
pub use super::message::Entity as Message;
pub use super::password_reset_token::Entity as PasswordResetToken;
pub use super::user::Entity as User;
