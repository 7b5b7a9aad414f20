pub mod dto;
pub mod entity;
pub mod handler;
pub mod scraper;
pub mod search;
pub mod service;
