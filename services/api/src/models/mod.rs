//! Entity models and payload types

pub mod attendee;
pub mod organization;
pub mod post;
pub mod user;

// Re-export for convenience
pub use attendee::{Attendee, Enrollment};
pub use organization::{
    Membership, NewOrganization, Organization, OrganizationUpdate, PublicOrganization,
};
pub use post::{NewPost, Post, PostDetails, PostRow, PostUpdate};
pub use user::{NewUser, PublicUser, User, UserUpdate};
