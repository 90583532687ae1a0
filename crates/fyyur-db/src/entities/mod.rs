pub mod artist;
pub mod category;
pub mod question;
pub mod show;
pub mod venue;
