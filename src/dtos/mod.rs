pub mod admin_dtos;
// short path: `crate::dtos::admin`
pub use admin_dtos as admin;
