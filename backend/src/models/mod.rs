pub mod following;
pub mod object_id;
pub mod organization;
