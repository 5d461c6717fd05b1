pub mod client;
pub mod webdriver;
