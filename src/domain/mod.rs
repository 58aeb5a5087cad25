mod directory_user;
mod subscribe_record;
mod subscriber_email;
// allow external `use` statements to skip the submodule names
pub use directory_user::DirectoryUser;
pub use directory_user::EmailExtractError;
pub use subscribe_record::EmailFormat;
pub use subscribe_record::SubscribeRecord;
pub use subscriber_email::SubscriberEmail;
