pub mod auth;
pub mod docs;
pub mod invitations;
pub mod members;
pub mod projects;
