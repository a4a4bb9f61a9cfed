pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod schema;
pub mod shorten;
pub mod usps;
pub mod validator;
