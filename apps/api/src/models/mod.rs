pub mod assessment;
pub mod question;
