pub mod header;
pub mod html;
