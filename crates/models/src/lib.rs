pub mod errors;
pub mod db;
pub mod slug;
pub mod company_info;
pub mod service;
pub mod project;
pub mod project_image;
pub mod testimonial;
pub mod gallery_image;
pub mod contact_message;

#[cfg(test)]
mod tests;
