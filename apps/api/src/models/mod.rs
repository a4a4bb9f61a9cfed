pub mod copy;
pub mod limits;
pub mod scraped;
