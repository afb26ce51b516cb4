pub mod controller;
pub mod form;
pub mod list;
pub mod models;
