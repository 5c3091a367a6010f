pub mod data;
pub mod pages;
